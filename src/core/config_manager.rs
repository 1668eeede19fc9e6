// src/core/config_manager.rs
//! Configuration for the analysis service: build mode, base URL, API contract

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

const DEVELOPMENT_BASE_URL: &str = "http://localhost:8000";
const PRODUCTION_BASE_URL: &str = "";
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Build-mode switch selecting where the analysis service lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    /// Interpret an environment value; anything unrecognised is development.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("production") | Some("prod") => BuildMode::Production,
            _ => BuildMode::Development,
        }
    }

    fn from_env() -> Self {
        let value = std::env::var("RESUME_MATCH_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .ok();
        Self::from_env_value(value.as_deref())
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            BuildMode::Development => DEVELOPMENT_BASE_URL,
            BuildMode::Production => PRODUCTION_BASE_URL,
        }
    }
}

/// Endpoint and field naming of the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ApiContract {
    /// `POST /analyze` with `resume` and `job_description`.
    Legacy,
    /// `POST /api/analyze_resume` with `file` and `job_desc`.
    #[default]
    Current,
}

impl ApiContract {
    pub fn analyze_path(&self) -> &'static str {
        match self {
            ApiContract::Legacy => "/analyze",
            ApiContract::Current => "/api/analyze_resume",
        }
    }

    pub fn file_field(&self) -> &'static str {
        match self {
            ApiContract::Legacy => "resume",
            ApiContract::Current => "file",
        }
    }

    pub fn text_field(&self) -> &'static str {
        match self {
            ApiContract::Legacy => "job_description",
            ApiContract::Current => "job_desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub mode: BuildMode,
    /// Empty means same-origin: paths stay relative and resolve against `origin`.
    pub base_url: String,
    pub origin: Option<String>,
    pub contract: ApiContract,
    /// `None` leaves requests without a deadline.
    pub timeout_seconds: Option<u64>,
}

impl ServiceConfig {
    pub fn for_mode(mode: BuildMode) -> Self {
        Self {
            mode,
            base_url: mode.default_base_url().to_string(),
            origin: None,
            contract: ApiContract::default(),
            timeout_seconds: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_contract(mut self, contract: ApiContract) -> Self {
        self.contract = contract;
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

/// One mode section of `config.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeSection {
    pub base_url: Option<String>,
    pub origin: Option<String>,
    pub contract: Option<ApiContract>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub development: ModeSection,
    #[serde(default)]
    pub production: ModeSection,
}

impl ConfigFile {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse configuration file")
    }

    pub fn section(&self, mode: BuildMode) -> &ModeSection {
        match mode {
            BuildMode::Development => &self.development,
            BuildMode::Production => &self.production,
        }
    }
}

/// Values given on the command line; they win over the file and the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub mode: Option<BuildMode>,
    pub config_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub origin: Option<String>,
    pub contract: Option<ApiContract>,
}

pub struct ConfigManager;

impl ConfigManager {
    /// Load the service configuration from environment, optional file and overrides
    pub fn load(overrides: ConfigOverrides) -> Result<ServiceConfig> {
        let mode = overrides.mode.unwrap_or_else(BuildMode::from_env);
        info!("Loading service configuration for mode: {:?}", mode);

        let file = match &overrides.config_path {
            Some(path) => Some(Self::read_file(path)?),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Some(Self::read_file(&default_path)?)
                } else {
                    None
                }
            }
        };

        Ok(Self::resolve(mode, file.as_ref(), &overrides))
    }

    /// Merge defaults for `mode`, the file section, then the overrides.
    pub fn resolve(
        mode: BuildMode,
        file: Option<&ConfigFile>,
        overrides: &ConfigOverrides,
    ) -> ServiceConfig {
        let mut config = ServiceConfig::for_mode(mode);

        if let Some(section) = file.map(|f| f.section(mode)) {
            if let Some(base_url) = &section.base_url {
                config.base_url = base_url.clone();
            }
            if section.origin.is_some() {
                config.origin = section.origin.clone();
            }
            if let Some(contract) = section.contract {
                config.contract = contract;
            }
            config.timeout_seconds = section.timeout_seconds;
        }

        if let Some(base_url) = &overrides.base_url {
            config.base_url = base_url.clone();
        }
        if overrides.origin.is_some() {
            config.origin = overrides.origin.clone();
        }
        if let Some(contract) = overrides.contract {
            config.contract = contract;
        }

        config
    }

    fn read_file(path: &Path) -> Result<ConfigFile> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        ConfigFile::from_yaml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}
