use anyhow::Result;
use clap::Parser;
use resume_match::cli::{handle_command, Cli};
use std::fs::OpenOptions;
use std::process::ExitCode;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const DEFAULT_LOG_DIRECTIVES: &str = "warn";

/// Directives for the stderr filter; without `RUST_LOG` only warnings and errors
/// interleave with the notifications printed there.
fn log_directives(rust_log: Option<String>) -> String {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => directives,
        _ => DEFAULT_LOG_DIRECTIVES.to_string(),
    }
}

fn init_logging() -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();

    // Optional JSON log file next to the compact stderr output
    let json_layer = match std::env::var("RESUME_MATCH_LOG_FILE") {
        Ok(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", path, e))?;
            let directives = rust_log.clone().unwrap_or_else(|| "info".to_string());
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_filter(EnvFilter::new(directives)),
            )
        }
        Err(_) => None,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::new(log_directives(rust_log))),
        )
        .with(json_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_logging()?;

    let cli = Cli::parse();
    if handle_command(cli).await? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
