//! Client for a remote resume / job-description matching service.
//!
//! [`core::SubmissionController`] owns the form state and the request lifecycle,
//! [`core::ServiceClient`] is the single HTTP boundary, and [`render`] turns
//! results and notifications into terminal text.

pub mod cli;
pub mod core;
pub mod render;
pub mod types;
pub mod utils;

pub use crate::core::{
    ApiContract, BuildMode, ConfigManager, Notification, RequestState, ServiceClient,
    ServiceConfig, SubmissionController, SubmissionError,
};
pub use crate::types::{AnalysisResult, ResumeFile};
