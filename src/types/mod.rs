// src/types/mod.rs
pub mod response;
pub mod submission;

pub use response::{AnalysisResult, ProbeResponse};
pub use submission::{ResumeFile, Submission, PDF_CONTENT_TYPE};
