//! Configuration management for the helpdesk pipeline.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - A `.env` file in the workspace
//! - Config file (`.helpdesk/config.yaml`)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources win. The completion-service credential must be resolvable
//! before the first stage runs; see [`AppConfig::validate`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Providers the LLM factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["openai", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .helpdesk/ and data/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Completion provider ("openai" or "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Completion service base URL; provider default when unset
    pub endpoint: Option<String>,

    /// API key for the completion service
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: Option<String>,

    /// Sampling temperature passed to every stage
    pub temperature: Option<f32>,

    /// Dataset partition settings
    pub data: DataConfig,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Where the domain datasets live and how their columns are named.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding `ds_<domain>.csv`; relative paths resolve against the workspace
    pub dir: Option<PathBuf>,

    /// Header of the keyword-list column
    #[serde(rename = "keywordColumn")]
    pub keyword_column: Option<String>,

    /// Header of the content column
    #[serde(rename = "contentColumn")]
    pub content_column: Option<String>,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    data: Option<DataConfig>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            endpoint: None,
            api_key: None,
            api_key_env: None,
            temperature: None,
            data: DataConfig::default(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration for the current directory.
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Load configuration for a workspace.
    ///
    /// Environment variables:
    /// - `HELPDESK_PROVIDER`: completion provider
    /// - `HELPDESK_MODEL` / `OPENAI_MODEL`: model identifier
    /// - `HELPDESK_API_BASE` / `OPENAI_API_BASE`: service base URL
    /// - `HELPDESK_API_KEY` / `OPENAI_API_KEY`: credential
    /// - `HELPDESK_DATA_DIR`: dataset directory
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use helpdesk_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }
        config.config_file = config_file;

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        // Values already present in the process environment take precedence
        let env_path = config.workspace.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).map_err(|e| {
                AppError::Config(format!("Failed to load {:?}: {}", env_path, e))
            })?;
            tracing::debug!("Loaded environment from {:?}", env_path);
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.helpdesk_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        config.apply_env(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if llm.endpoint.is_some() {
                result.endpoint = llm.endpoint;
            }
            if llm.api_key_env.is_some() {
                result.api_key_env = llm.api_key_env;
            }
            if llm.temperature.is_some() {
                result.temperature = llm.temperature;
            }
        }

        if let Some(data) = config_file.data {
            if data.dir.is_some() {
                result.data.dir = data.dir;
            }
            if data.keyword_column.is_some() {
                result.data.keyword_column = data.keyword_column;
            }
            if data.content_column.is_some() {
                result.data.content_column = data.content_column;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply environment overrides through a lookup function.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let first = |keys: &[&str]| keys.iter().find_map(|key| lookup(*key));

        if let Some(provider) = first(&["HELPDESK_PROVIDER"]) {
            self.provider = provider;
        }

        if let Some(model) = first(&["HELPDESK_MODEL", "OPENAI_MODEL"]) {
            self.model = model;
        }

        if let Some(endpoint) = first(&["HELPDESK_API_BASE", "OPENAI_API_BASE"]) {
            self.endpoint = Some(endpoint);
        }

        let custom_key = self.api_key_env.as_deref().and_then(&lookup);
        self.api_key = first(&["HELPDESK_API_KEY"])
            .or(custom_key)
            .or_else(|| first(&["OPENAI_API_KEY"]))
            .filter(|key| !key.trim().is_empty());

        if let Some(dir) = first(&["HELPDESK_DATA_DIR"]) {
            self.data.dir = Some(PathBuf::from(dir));
        }

        if let Some(level) = first(&["RUST_LOG"]) {
            self.log_level = Some(level);
        }

        if lookup("NO_COLOR").is_some() {
            self.no_color = true;
        }
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .helpdesk directory.
    pub fn helpdesk_dir(&self) -> PathBuf {
        self.workspace.join(".helpdesk")
    }

    /// Directory holding the domain datasets.
    pub fn data_dir(&self) -> PathBuf {
        match &self.data.dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.workspace.join(dir),
            None => self.workspace.join("data"),
        }
    }

    /// Resolve the API key for the active provider.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| {
            self.api_key_env
                .as_deref()
                .and_then(|env_var| std::env::var(env_var).ok())
                .filter(|key| !key.trim().is_empty())
        })
    }

    /// Validate configuration for the active provider.
    ///
    /// Must succeed before any pipeline stage runs.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();

        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model identifier is empty".to_string()));
        }

        if provider == "openai" && self.resolve_api_key().is_none() {
            return Err(AppError::Config(
                "API key not found: set HELPDESK_API_KEY or OPENAI_API_KEY".to_string(),
            ));
        }

        Ok(())
    }
}
