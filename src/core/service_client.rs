// src/core/service_client.rs
//! HTTP client for the remote analysis service - one multipart POST per analysis

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{error, info, trace};

use crate::core::config_manager::{ApiContract, ServiceConfig};
use crate::types::response::DetailBody;
use crate::types::{AnalysisResult, ProbeResponse, Submission};

const PROBE_ENDPOINT: &str = "/";

#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
    origin: Option<String>,
    contract: ApiContract,
}

impl ServiceClient {
    /// Create new service client with configuration
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            origin: config.origin.clone(),
            contract: config.contract,
        })
    }

    /// Resume + job description analysis - sends the multipart form, receives the match
    pub async fn analyze(&self, submission: &Submission) -> Result<AnalysisResult> {
        let url = self.endpoint_url(self.contract.analyze_path())?;

        let file_part = Part::bytes(submission.file.bytes.clone())
            .file_name(submission.file.file_name.clone())
            .mime_str(&submission.file.content_type)
            .context("Failed to create multipart")?;

        let form = Form::new()
            .part(self.contract.file_field(), file_part)
            .text(
                self.contract.text_field(),
                submission.job_description.clone(),
            );

        info!("Calling resume analysis service: {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        trace!("Response status: {}", status);

        if status.is_success() {
            let response_text = response
                .text()
                .await
                .context("Failed to read response text")?;

            trace!("Raw analysis response: {}", response_text);

            let body: Value = serde_json::from_str(&response_text).with_context(|| {
                format!(
                    "Failed to parse analysis response as JSON. Raw response: {}",
                    response_text
                )
            })?;

            AnalysisResult::from_payload(&body).map_err(|payload| {
                anyhow::anyhow!(
                    "Analysis service reported an error: {}",
                    payload.message.as_deref().unwrap_or("no message")
                )
            })
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            error!("Analysis service error response: {}", error_text);
            anyhow::bail!(
                "Service returned error status {}: {}",
                status,
                error_detail(&error_text)
            )
        }
    }

    /// Connectivity probe - `GET /`, reports the service greeting
    pub async fn probe(&self) -> Result<ProbeResponse> {
        let url = self.endpoint_url(PROBE_ENDPOINT)?;
        info!("Probing analysis service: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to GET from {}", url))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read response text")?;

        if !status.is_success() {
            anyhow::bail!("HTTP {} error: {}", status, error_detail(&text));
        }

        Ok(probe_message(&text))
    }

    fn endpoint_url(&self, path: &str) -> Result<String> {
        build_url(&self.base_url, self.origin.as_deref(), path)
    }
}

/// Join base and path; an empty base keeps the path relative to `origin`.
pub fn build_url(base_url: &str, origin: Option<&str>, path: &str) -> Result<String> {
    let base = base_url.trim_end_matches('/');
    if !base.is_empty() {
        return Ok(format!("{}{}", base, path));
    }

    match origin.map(|o| o.trim_end_matches('/')) {
        Some(origin) if !origin.is_empty() => Ok(format!("{}{}", origin, path)),
        _ => anyhow::bail!(
            "Relative endpoint '{}' has no origin to resolve against. Set a base URL or an origin.",
            path
        ),
    }
}

fn error_detail(body: &str) -> String {
    match serde_json::from_str::<DetailBody>(body) {
        Ok(DetailBody {
            detail: Value::String(detail),
        }) => detail,
        Ok(DetailBody { detail }) => detail.to_string(),
        Err(_) => body.to_string(),
    }
}

fn probe_message(body: &str) -> ProbeResponse {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            ProbeResponse {
                message: Some(message),
            }
        }
        Err(_) if body.trim().is_empty() => ProbeResponse::default(),
        Err(_) => ProbeResponse {
            message: Some(body.trim().to_string()),
        },
    }
}
