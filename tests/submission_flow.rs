//! End-to-end behaviour of the form controller against a mocked analysis service.

use std::time::Duration;

use resume_match::core::controller::{Outcome, GENERIC_FAILURE_MESSAGE};
use resume_match::{
    ApiContract, BuildMode, RequestState, ResumeFile, ServiceClient, ServiceConfig,
    SubmissionController, SubmissionError,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resume() -> ResumeFile {
    ResumeFile::new("jane_doe.pdf", "application/pdf", b"%PDF-1.4 jane doe resume".to_vec())
}

fn client_for(server: &MockServer, contract: ApiContract) -> ServiceClient {
    let config = ServiceConfig::for_mode(BuildMode::Development)
        .with_base_url(server.uri())
        .with_contract(contract);
    ServiceClient::new(&config).unwrap()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

#[tokio::test]
async fn current_contract_sends_one_request_with_both_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze_resume"))
        .and(body_string_contains("name=\"file\"; filename=\"jane_doe.pdf\""))
        .and(body_string_contains("name=\"job_desc\""))
        .and(body_string_contains("Senior Rust engineer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "match_percentage": 71,
            "strengths": ["Rust", "Distributed systems"],
            "weaknesses": ["Kubernetes"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut form, _rx) = SubmissionController::new(client_for(&server, ApiContract::Current));
    form.select_file(resume()).unwrap();
    form.set_job_description("Senior Rust engineer");

    let state = form.submit().await.unwrap().clone();
    match state {
        RequestState::Success(result) => {
            assert_eq!(result.match_percentage, Some(71.0));
            assert_eq!(result.strengths, vec!["Rust", "Distributed systems"]);
            assert_eq!(result.weaknesses, vec!["Kubernetes"]);
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn legacy_contract_string_shape_exposes_score() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_string_contains("name=\"resume\"; filename=\"jane_doe.pdf\""))
        .and(body_string_contains("name=\"job_description\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "match_percentage": 82,
            "strengths": "A",
            "weaknesses": "B"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut form, mut rx) = SubmissionController::new(client_for(&server, ApiContract::Legacy));
    form.select_file(resume()).unwrap();
    form.set_job_description("Platform engineer");
    form.submit().await.unwrap();

    let result = form.result().expect("success state");
    assert_eq!(result.match_percentage, Some(82.0));
    assert_eq!(result.strengths, vec!["A"]);
    assert_eq!(result.weaknesses, vec!["B"]);

    let mut last = None;
    while let Ok(n) = rx.try_recv() {
        last = Some(n);
    }
    assert_eq!(last.unwrap().description, "Match score: 82%");
}

#[tokio::test]
async fn invalid_input_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let (mut form, _rx) = SubmissionController::new(client_for(&server, ApiContract::Current));

    form.set_job_description("Data engineer");
    assert_eq!(form.submit().await.err(), Some(SubmissionError::MissingFile));

    form.select_file(resume()).unwrap();
    form.set_job_description("  \n ");
    assert_eq!(
        form.submit().await.err(),
        Some(SubmissionError::EmptyJobDescription)
    );

    assert!(form
        .select_file(ResumeFile::new("cv.docx", "application/msword", vec![1]))
        .is_err());

    assert_eq!(form.state(), &RequestState::Idle);
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn server_error_moves_to_failure_and_allows_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"detail": "An unexpected server error occurred"})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "match_percentage": 55,
            "strengths": ["SQL"],
            "weaknesses": []
        })))
        .mount(&server)
        .await;

    let (mut form, _rx) = SubmissionController::new(client_for(&server, ApiContract::Current));
    form.select_file(resume()).unwrap();
    form.set_job_description("Analyst");

    let state = form.submit().await.unwrap().clone();
    assert_eq!(state, RequestState::Failure(GENERIC_FAILURE_MESSAGE.to_string()));
    assert!(form.can_submit());

    form.submit().await.unwrap();
    assert_eq!(form.result().unwrap().match_percentage, Some(55.0));
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn error_payload_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": true,
            "message": "Error analyzing resume. Please try again."
        })))
        .mount(&server)
        .await;

    let (mut form, _rx) = SubmissionController::new(client_for(&server, ApiContract::Current));
    form.select_file(resume()).unwrap();
    form.set_job_description("Analyst");

    assert!(matches!(
        form.submit().await.unwrap(),
        RequestState::Failure(_)
    ));
}

#[tokio::test]
async fn network_failure_moves_to_failure() {
    // Nothing listens on port 1.
    let config = ServiceConfig::for_mode(BuildMode::Development).with_base_url("http://127.0.0.1:1");
    let (mut form, mut rx) = SubmissionController::new(ServiceClient::new(&config).unwrap());
    form.select_file(resume()).unwrap();
    form.set_job_description("Analyst");

    let state = form.submit().await.unwrap().clone();
    assert_eq!(state, RequestState::Failure(GENERIC_FAILURE_MESSAGE.to_string()));
    assert!(form.can_submit());

    let mut titles = Vec::new();
    while let Ok(n) = rx.try_recv() {
        titles.push(n.title);
    }
    assert_eq!(titles.last().map(String::as_str), Some("Analysis failed"));
}

#[tokio::test]
async fn late_response_after_reset_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"match_percentage": 90}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let (mut form, _rx) = SubmissionController::new(client_for(&server, ApiContract::Current));
    form.select_file(resume()).unwrap();
    form.set_job_description("Analyst");

    let pending = form.begin_submit().unwrap();
    let request = tokio::spawn(pending.run());

    tokio::time::sleep(Duration::from_millis(50)).await;
    form.reset();

    let completion = request.await.unwrap();
    assert!(matches!(completion.outcome(), Outcome::Cancelled));
    assert!(!form.complete(completion));

    assert_eq!(form.state(), &RequestState::Idle);
    assert!(form.result().is_none());
    assert!(form.file().is_none());
    assert_eq!(form.job_description(), "");
}

#[tokio::test]
async fn reset_after_success_clears_everything() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "match_percentage": 82,
            "strengths": "A",
            "weaknesses": "B"
        })))
        .mount(&server)
        .await;

    let (mut form, _rx) = SubmissionController::new(client_for(&server, ApiContract::Legacy));
    form.select_file(resume()).unwrap();
    form.set_job_description("Analyst");
    form.submit().await.unwrap();
    assert!(form.result().is_some());

    form.reset();
    assert_eq!(form.state(), &RequestState::Idle);
    assert!(form.result().is_none());
    assert!(form.file().is_none());
    assert_eq!(form.job_description(), "");
}

#[tokio::test]
async fn probe_reports_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "API is running"})))
        .mount(&server)
        .await;

    let client = client_for(&server, ApiContract::Current);
    let response = client.probe().await.unwrap();
    assert_eq!(response.message.as_deref(), Some("API is running"));
}

#[tokio::test]
async fn production_mode_resolves_relative_paths_against_origin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze_resume"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"match_percentage": 12})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ServiceConfig::for_mode(BuildMode::Production).with_origin(server.uri());
    assert_eq!(config.base_url, "");

    let (mut form, _rx) = SubmissionController::new(ServiceClient::new(&config).unwrap());
    form.select_file(resume()).unwrap();
    form.set_job_description("Analyst");
    form.submit().await.unwrap();
    assert_eq!(form.result().unwrap().match_percentage, Some(12.0));
}
