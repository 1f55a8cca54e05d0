use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

const DEFAULT_CONFIG_FILE: &str = "index-import.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub import: ImportConfig,
    pub http: HttpConfig,
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the hosted-repository content API, e.g. https://api.github.com
    pub api_url: String,
    pub organization: String,
    pub repository: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".into(),
            organization: "opencybersecurityalliance".into(),
            repository: "data-bucket-kestrel".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Directory the archive entries are extracted into
    pub directory: PathBuf,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("/tmp"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Optional API token, sent as a bearer token
    pub token: Option<String>,
    /// Whole-request timeout. Unset means requests may block indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
            token: None,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        // Step 1: Try loading .env file (silently ignore if not found)
        let _ = dotenvy::dotenv();

        // Step 2: Explicit config file must exist; the default one is optional
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => AppConfig::default(),
        };

        // Step 3: Override with environment variables where present
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str::<AppConfig>(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(val) = var("INDEX_IMPORT_API_URL") {
            self.source.api_url = val;
        }
        if let Some(val) = var("INDEX_IMPORT_ORGANIZATION") {
            self.source.organization = val;
        }
        if let Some(val) = var("INDEX_IMPORT_REPOSITORY") {
            self.source.repository = val;
        }
        if let Some(val) = var("INDEX_IMPORT_DIRECTORY") {
            self.import.directory = PathBuf::from(val);
        }
        if let Some(val) = var("INDEX_IMPORT_USER_AGENT") {
            self.http.user_agent = val;
        }
        if let Some(val) = var("GITHUB_TOKEN") {
            self.http.token = Some(val).filter(|t| !t.is_empty());
        }
        if let Some(val) = var("INDEX_IMPORT_TIMEOUT_SECS") {
            self.http.timeout_secs = Some(
                val.parse()
                    .with_context(|| format!("INDEX_IMPORT_TIMEOUT_SECS is not a number: {val}"))?,
            );
        }
        if let Some(val) = var("INDEX_IMPORT_LOG_LEVEL") {
            self.logging.level = val;
        }
        Ok(())
    }
}

/// The four resolved parameters of a single import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPlan {
    pub index: String,
    pub directory: PathBuf,
    pub organization: String,
    pub repository: String,
}

impl ImportPlan {
    /// Command-line flags win over whatever the config layer resolved.
    pub fn resolve(cli: &Cli, config: &AppConfig) -> Self {
        let plan = Self {
            index: cli.index.clone(),
            directory: cli
                .directory
                .clone()
                .unwrap_or_else(|| config.import.directory.clone()),
            organization: cli
                .organization
                .clone()
                .unwrap_or_else(|| config.source.organization.clone()),
            repository: cli
                .repository
                .clone()
                .unwrap_or_else(|| config.source.repository.clone()),
        };

        tracing::info!(
            "Running with the following args: target_dir = {}, organization = {}, repository = {}",
            plan.directory.display(),
            plan.organization,
            plan.repository
        );

        plan
    }
}
