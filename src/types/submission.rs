// src/types/submission.rs
use std::fmt;

/// The only MIME type the form accepts for a resume.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A file as handed over by a picker or a drop target.
#[derive(Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == PDF_CONTENT_TYPE
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// Keep the raw bytes out of log lines.
impl fmt::Debug for ResumeFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResumeFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Snapshot of the form at the moment it is sent.
#[derive(Debug, Clone)]
pub struct Submission {
    pub file: ResumeFile,
    pub job_description: String,
}
