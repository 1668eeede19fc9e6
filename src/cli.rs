// src/cli.rs
use crate::core::{
    ApiContract, BuildMode, ConfigManager, Notification, RequestState, ServiceClient,
    SubmissionController,
};
use crate::core::config_manager::ConfigOverrides;
use crate::render::{render_character_count, render_notification, render_result};
use crate::utils::{format_file_size, load_resume, read_file_content};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "resume-match")]
#[command(about = "Match a resume against a job description using the analysis service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Build mode selecting the service address
    #[arg(long, value_enum, global = true)]
    pub mode: Option<BuildMode>,

    /// Configuration file (defaults to ./config.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Service base URL, overriding the build mode default
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Origin for relative endpoints in production mode
    #[arg(long, global = true)]
    pub origin: Option<String>,

    /// Endpoint and field naming of the analysis service
    #[arg(long, value_enum, global = true)]
    pub contract: Option<ApiContract>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a PDF resume against a job description
    Analyze {
        #[arg(long)]
        resume: PathBuf,
        #[arg(long, conflicts_with = "job_file", required_unless_present = "job_file")]
        job_description: Option<String>,
        /// Read the job description from a file
        #[arg(long)]
        job_file: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the analysis service answers
    Probe,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            mode: self.mode,
            config_path: self.config.clone(),
            base_url: self.base_url.clone(),
            origin: self.origin.clone(),
            contract: self.contract,
        }
    }
}

/// Run one command. `Ok(false)` means the command ran but did not succeed.
pub async fn handle_command(cli: Cli) -> Result<bool> {
    let config = ConfigManager::load(cli.overrides())?;
    info!(
        "Service base URL: '{}' ({:?} contract)",
        config.base_url, config.contract
    );
    let client = ServiceClient::new(&config)?;

    match cli.command {
        Command::Analyze {
            resume,
            job_description,
            job_file,
            json,
        } => {
            let job_description = match (job_description, job_file) {
                (Some(text), _) => text,
                (None, Some(path)) => read_file_content(&path).await?,
                (None, None) => anyhow::bail!("Provide --job-description or --job-file"),
            };
            let file = load_resume(&resume).await?;
            analyze(client, file, job_description, json).await
        }

        Command::Probe => match client.probe().await {
            Ok(response) => {
                println!("{}", response.message.unwrap_or_default());
                Ok(true)
            }
            Err(e) => {
                error!("Connectivity probe failed: {:#}", e);
                println!("Error while fetching data");
                Ok(false)
            }
        },
    }
}

async fn analyze(
    client: ServiceClient,
    file: crate::types::ResumeFile,
    job_description: String,
    json: bool,
) -> Result<bool> {
    let (mut form, mut notifications) = SubmissionController::new(client);

    let size = format_file_size(file.size());
    if form.select_file(file).is_ok() {
        if let Some(selected) = form.file() {
            eprintln!("{} ({})", selected.file_name, size);
        }
    }
    form.set_job_description(job_description);
    eprintln!("{}", render_character_count(form.character_count()));

    let submitted = match form.begin_submit() {
        Ok(pending) => {
            info!("Analysis attempt {} started", pending.attempt_id());
            let completion = pending.run().await;
            form.complete(completion);
            Ok(form.state().clone())
        }
        Err(e) => Err(e),
    };
    print_notifications(&mut notifications);

    match submitted {
        Ok(RequestState::Success(result)) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render_result(&result));
            }
            Ok(true)
        }
        Ok(RequestState::Failure(message)) => {
            eprintln!("{}", message);
            Ok(false)
        }
        Ok(_) => Ok(false),
        Err(e) => {
            info!("Submission blocked: {}", e);
            Ok(false)
        }
    }
}

fn print_notifications(rx: &mut UnboundedReceiver<Notification>) {
    while let Ok(notification) = rx.try_recv() {
        eprintln!("{}", render_notification(&notification));
    }
}
