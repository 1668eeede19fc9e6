// src/core/controller.rs
//! Submission form controller: holds the resume and job description, enforces the
//! client-side rules, and drives one analysis request at a time.
//!
//! ```text
//! Idle ──submit──▶ Loading ──ok──▶ Success ──reset──▶ Idle
//!                     │
//!                     └──error──▶ Failure ──submit──▶ Loading
//! ```
//!
//! Notifications are pushed on an unbounded channel for whatever presents the form.

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::core::ServiceClient;
use crate::types::{AnalysisResult, ResumeFile, Submission};
use crate::utils::format_percentage;

/// Message kept in [`RequestState::Failure`]; the cause only goes to the log.
pub const GENERIC_FAILURE_MESSAGE: &str = "Error analyzing resume. Please try again.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("no resume file selected")]
    MissingFile,

    #[error("job description is empty")]
    EmptyJobDescription,

    #[error("unsupported file type '{content_type}', expected application/pdf")]
    InvalidFileType { content_type: String },

    #[error("an analysis is already in progress")]
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    Idle,
    Loading,
    Success(AnalysisResult),
    Failure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Info,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NotificationVariant::Info,
        }
    }

    fn destructive(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}

pub struct SubmissionController {
    client: ServiceClient,
    file: Option<ResumeFile>,
    job_description: String,
    state: RequestState,
    generation: u64,
    in_flight: Option<CancellationToken>,
    notifications: UnboundedSender<Notification>,
}

/// A request that left the form but has not been sent yet.
pub struct PendingAnalysis {
    client: ServiceClient,
    submission: Submission,
    token: CancellationToken,
    generation: u64,
    attempt_id: Uuid,
}

#[derive(Debug)]
pub enum Outcome {
    Completed(anyhow::Result<AnalysisResult>),
    Cancelled,
}

/// What came back for one attempt, tagged so the form can tell whether it is stale.
#[derive(Debug)]
pub struct Completion {
    generation: u64,
    attempt_id: Uuid,
    token: CancellationToken,
    outcome: Outcome,
}

impl Completion {
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}

impl PendingAnalysis {
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    /// Send the request, giving up as soon as the form is reset.
    pub async fn run(self) -> Completion {
        let outcome = tokio::select! {
            biased;
            _ = self.token.cancelled() => Outcome::Cancelled,
            result = self.client.analyze(&self.submission) => Outcome::Completed(result),
        };

        Completion {
            generation: self.generation,
            attempt_id: self.attempt_id,
            token: self.token,
            outcome,
        }
    }
}

impl SubmissionController {
    pub fn new(client: ServiceClient) -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            client,
            file: None,
            job_description: String::new(),
            state: RequestState::Idle,
            generation: 0,
            in_flight: None,
            notifications: tx,
        };
        (controller, rx)
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            RequestState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn file(&self) -> Option<&ResumeFile> {
        self.file.as_ref()
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading)
    }

    /// Picker selection. Anything but a PDF leaves the stored file untouched.
    pub fn select_file(&mut self, file: ResumeFile) -> Result<(), SubmissionError> {
        if !file.is_pdf() {
            warn!(
                "Rejected resume '{}' with content type '{}'",
                file.file_name, file.content_type
            );
            self.notify(Notification::destructive(
                "Invalid file type",
                "Please select a PDF file.",
            ));
            return Err(SubmissionError::InvalidFileType {
                content_type: file.content_type,
            });
        }

        info!("Resume selected: {} ({} bytes)", file.file_name, file.size());
        self.notify(Notification::info(
            "File uploaded",
            format!("{} has been selected.", file.file_name),
        ));
        self.file = Some(file);
        Ok(())
    }

    /// Drag-and-drop: only the first dropped file counts.
    pub fn drop_files(&mut self, files: Vec<ResumeFile>) -> Result<(), SubmissionError> {
        match files.into_iter().next() {
            Some(file) => self.select_file(file),
            None => Ok(()),
        }
    }

    pub fn remove_file(&mut self) {
        self.file = None;
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
    }

    /// Counts Unicode scalar values, so "😀" is 1 (a browser's UTF-16 length says 2).
    pub fn character_count(&self) -> usize {
        self.job_description.chars().count()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && self.file.is_some() && !self.job_description.trim().is_empty()
    }

    /// Validate the form and move to Loading. No request is sent here.
    pub fn begin_submit(&mut self) -> Result<PendingAnalysis, SubmissionError> {
        if self.is_loading() {
            debug!("Submit ignored, analysis already in progress");
            return Err(SubmissionError::Busy);
        }

        let file = match &self.file {
            Some(file) => file.clone(),
            None => return Err(self.missing_information(SubmissionError::MissingFile)),
        };
        if self.job_description.trim().is_empty() {
            return Err(self.missing_information(SubmissionError::EmptyJobDescription));
        }

        self.generation += 1;
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        self.state = RequestState::Loading;

        let attempt_id = Uuid::new_v4();
        info!(
            "Submitting analysis attempt {} for '{}' ({} characters of job description)",
            attempt_id,
            file.file_name,
            self.character_count()
        );

        Ok(PendingAnalysis {
            client: self.client.clone(),
            submission: Submission {
                file,
                job_description: self.job_description.clone(),
            },
            token,
            generation: self.generation,
            attempt_id,
        })
    }

    /// Apply a finished attempt. Returns false when it was stale and got dropped.
    pub fn complete(&mut self, completion: Completion) -> bool {
        if completion.token.is_cancelled()
            || completion.generation != self.generation
            || !self.is_loading()
        {
            debug!(
                "Discarding completion of attempt {} (stale or cancelled)",
                completion.attempt_id
            );
            return false;
        }

        self.in_flight = None;

        match completion.outcome {
            Outcome::Completed(Ok(result)) => {
                info!(
                    "Analysis attempt {} complete, match {:?}",
                    completion.attempt_id, result.match_percentage
                );
                self.notify(Notification::info(
                    "Analysis complete",
                    format!("Match score: {}%", format_percentage(result.match_percentage)),
                ));
                self.state = RequestState::Success(result);
            }
            Outcome::Completed(Err(e)) => {
                error!("Error analyzing resume (attempt {}): {:#}", completion.attempt_id, e);
                self.notify(Notification::destructive(
                    "Analysis failed",
                    "Please check if the backend server is running and try again.",
                ));
                self.state = RequestState::Failure(GENERIC_FAILURE_MESSAGE.to_string());
            }
            Outcome::Cancelled => {
                debug!("Attempt {} cancelled", completion.attempt_id);
                return false;
            }
        }

        true
    }

    /// Validate, send and apply in one go.
    pub async fn submit(&mut self) -> Result<&RequestState, SubmissionError> {
        let pending = self.begin_submit()?;
        let completion = pending.run().await;
        self.complete(completion);
        Ok(&self.state)
    }

    /// Clear file, text and result. Anything still in flight is cancelled.
    pub fn reset(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.generation += 1;
        self.file = None;
        self.job_description.clear();
        self.state = RequestState::Idle;
    }

    fn missing_information(&self, reason: SubmissionError) -> SubmissionError {
        debug!("Submit blocked: {}", reason);
        self.notify(Notification::destructive(
            "Missing information",
            "Please upload a resume and enter a job description.",
        ));
        reason
    }

    fn notify(&self, notification: Notification) {
        // Nobody listening is fine.
        let _ = self.notifications.send(notification);
    }
}
