// src/utils.rs
use anyhow::{Context, Result};
use std::path::Path;

use crate::types::ResumeFile;

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// MIME type a file picker would report for this name
pub fn content_type_for(filename: &str) -> &'static str {
    match get_file_extension(filename).as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("doc") => "application/msword",
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Load a resume from disk the way a picker hands it over
pub async fn load_resume(path: &Path) -> Result<ResumeFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Path has no file name: {}", path.display()))?;

    let content_type = content_type_for(&file_name);
    Ok(ResumeFile::new(file_name, content_type, bytes))
}

/// Read file content as string with proper error context
pub async fn read_file_content(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Size in megabytes with two decimals, e.g. "0.25 MB"
pub fn format_file_size(bytes: usize) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Score without a trailing ".0"; "?" when the service sent none
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
        Some(v) => format!("{:.1}", v),
        None => "?".to_string(),
    }
}
