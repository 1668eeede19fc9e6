// src/types/response.rs
//! Service response types and the normalization of the two observed wire shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ===== Canonical result =====

/// Match analysis as held by the form after a successful call.
///
/// Fields the service omitted or sent in an unexpected shape are left empty
/// instead of failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub match_percentage: Option<f64>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Explicit failure reported inside a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPayload {
    pub message: Option<String>,
}

impl AnalysisResult {
    /// Single entry point from a decoded response body to the canonical shape.
    ///
    /// Accepts `strengths`/`weaknesses` either as one string or as a list of
    /// strings, and unwraps an `{"analysis": {...}}` envelope when present.
    /// A body with a truthy `error` field is returned as [`ErrorPayload`].
    pub fn from_payload(body: &Value) -> Result<Self, ErrorPayload> {
        let body = match body.get("analysis") {
            Some(inner) if inner.is_object() => inner,
            _ => body,
        };

        if let Some(error) = error_payload(body) {
            return Err(error);
        }

        Ok(Self {
            match_percentage: body.get("match_percentage").and_then(percentage),
            strengths: body.get("strengths").map(findings).unwrap_or_default(),
            weaknesses: body.get("weaknesses").map(findings).unwrap_or_default(),
        })
    }
}

fn error_payload(body: &Value) -> Option<ErrorPayload> {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);

    match body.get("error")? {
        Value::Bool(true) => Some(ErrorPayload { message }),
        Value::String(text) if !text.trim().is_empty() => Some(ErrorPayload {
            message: message.or_else(|| Some(text.clone())),
        }),
        Value::Object(_) => Some(ErrorPayload { message }),
        _ => None,
    }
}

fn percentage(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn findings(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                Vec::new()
            } else {
                vec![text.to_string()]
            }
        }
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

// ===== Connectivity probe =====

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// ===== Error bodies on non-2xx =====

/// FastAPI style `{"detail": ...}` error body.
#[derive(Debug, Deserialize)]
pub(crate) struct DetailBody {
    pub detail: Value,
}
