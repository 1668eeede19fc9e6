// src/render.rs
//! Terminal rendering of form notifications and analysis results

use crate::core::{Notification, NotificationVariant};
use crate::types::AnalysisResult;
use crate::utils::format_percentage;

const BAR_WIDTH: usize = 20;

pub fn render_notification(notification: &Notification) -> String {
    let marker = match notification.variant {
        NotificationVariant::Info => "✓",
        NotificationVariant::Destructive => "✗",
    };
    format!(
        "{} {}: {}",
        marker, notification.title, notification.description
    )
}

pub fn render_character_count(count: usize) -> String {
    format!("{} characters", count)
}

/// Fixed-width bar; values are clamped to 0..=100.
pub fn progress_bar(percentage: Option<f64>) -> String {
    let value = percentage.unwrap_or(0.0).clamp(0.0, 100.0);
    let filled = ((value / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn render_result(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str("Match Analysis Complete\n\n");
    out.push_str(&format!(
        "  {}%  {}\n",
        format_percentage(result.match_percentage),
        progress_bar(result.match_percentage)
    ));
    out.push_str("  Overall Match Score\n\n");

    render_section(&mut out, "Strengths", &result.strengths);
    out.push('\n');
    render_section(&mut out, "Areas for Improvement", &result.weaknesses);
    out
}

fn render_section(out: &mut String, title: &str, items: &[String]) {
    out.push_str(title);
    out.push('\n');
    if items.is_empty() {
        out.push_str("  (none reported)\n");
        return;
    }
    for item in items {
        out.push_str(&format!("  - {}\n", item));
    }
}
