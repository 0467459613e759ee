use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::errors::AppError;
use crate::language_utils::{self, LanguageEntry};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Documentation root holding the source documents
    #[serde(default = "default_docs_root")]
    pub docs_root: PathBuf,

    /// Target languages, in processing order
    #[serde(default = "default_languages")]
    pub languages: Vec<LanguageEntry>,

    /// Internal link prefix rewritten to point into the translated subtree
    #[serde(default = "default_link_prefix")]
    pub link_prefix: String,

    /// What the documentation is about, named in the prompt
    #[serde(default = "default_project_description")]
    pub project_description: String,

    /// Inference endpoint settings
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Inference endpoint configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InferenceConfig {
    /// Chat-completions URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the bearer token
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Temperature parameter for text generation (0.0 to 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling mass
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Output token ceiling
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Reasoning effort hint sent with each request
    #[serde(default = "default_reasoning_effort")]
    pub reasoning_effort: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Delay in milliseconds after each written translation
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Back-off multiplier applied to the advertised retry interval
    #[serde(default = "default_retry_multiplier")]
    pub retry_multiplier: f64,

    /// Retry interval in seconds when the endpoint does not advertise one
    #[serde(default = "default_retry_after_secs")]
    pub default_retry_after_secs: u64,

    /// Maximum retries after a rate limit per document; unbounded when unset
    #[serde(default)]
    pub max_rate_limit_retries: Option<u32>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            reasoning_effort: default_reasoning_effort(),
            timeout_secs: default_timeout_secs(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            retry_multiplier: default_retry_multiplier(),
            default_retry_after_secs: default_retry_after_secs(),
            max_rate_limit_retries: None,
        }
    }
}

impl InferenceConfig {
    /// Pause between consecutive translations
    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_delay_ms)
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String, AppError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(AppError::Config(format!(
                "{} environment variable is not set",
                self.api_key_env
            ))),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_docs_root() -> PathBuf {
    PathBuf::from("docs")
}

fn default_languages() -> Vec<LanguageEntry> {
    vec![
        LanguageEntry::new("Russian", "ru"),
        LanguageEntry::new("Brazilian Portuguese", "pt-br"),
        LanguageEntry::new("Chinese Simplified", "cn"),
        LanguageEntry::new("Spanish", "es"),
        LanguageEntry::new("German", "de"),
        LanguageEntry::new("Japanese", "jp"),
    ]
}

fn default_link_prefix() -> String {
    "/docs/".to_string()
}

fn default_project_description() -> String {
    "a software project".to_string()
}

fn default_endpoint() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "openai/gpt-oss-20b".to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_top_p() -> f32 {
    0.75
}

fn default_max_tokens() -> u32 {
    65536
}

fn default_reasoning_effort() -> String {
    "low".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_rate_limit_delay_ms() -> u64 {
    500
}

fn default_retry_multiplier() -> f64 {
    3.0
}

fn default_retry_after_secs() -> u64 {
    10
}

impl Config {
    /// Load the configuration file, or write and return the defaults if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;

            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;

            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {:?}", path))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.languages.is_empty() {
            return Err(AppError::Config("At least one language must be configured".to_string()));
        }

        let mut seen = HashSet::new();
        for language in &self.languages {
            language_utils::validate_language_code(&language.code)?;

            if language.name.trim().is_empty() {
                return Err(AppError::Config(format!("Language '{}' has no display name", language.code)));
            }

            if !seen.insert(language.code.to_lowercase()) {
                return Err(AppError::Config(format!("Duplicate language code: {}", language.code)));
            }
        }

        if !self.link_prefix.starts_with('/') || !self.link_prefix.ends_with('/') {
            return Err(AppError::Config(format!(
                "Link prefix must start and end with '/': {}",
                self.link_prefix
            )));
        }

        let endpoint = Url::parse(&self.inference.endpoint)
            .map_err(|e| AppError::Config(format!("Invalid endpoint '{}': {}", self.inference.endpoint, e)))?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(AppError::Config(format!("Endpoint must use http or https: {}", endpoint)));
        }

        if self.inference.model.trim().is_empty() {
            return Err(AppError::Config("Model name must not be empty".to_string()));
        }

        if self.inference.api_key_env.trim().is_empty() {
            return Err(AppError::Config("API key environment variable name must not be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.inference.temperature) {
            return Err(AppError::Config(format!("Temperature out of range: {}", self.inference.temperature)));
        }

        if !(0.0..=1.0).contains(&self.inference.top_p) {
            return Err(AppError::Config(format!("top_p out of range: {}", self.inference.top_p)));
        }

        if self.inference.max_tokens == 0 {
            return Err(AppError::Config("max_tokens must be positive".to_string()));
        }

        if !self.inference.retry_multiplier.is_finite() || self.inference.retry_multiplier < 0.0 {
            return Err(AppError::Config(format!(
                "Retry multiplier must be a non-negative number: {}",
                self.inference.retry_multiplier
            )));
        }

        Ok(())
    }

    /// Select the languages to process: one by code, or all when `code` is None
    pub fn select_languages(&self, code: Option<&str>) -> Result<Vec<LanguageEntry>, AppError> {
        let Some(code) = code else {
            return Ok(self.languages.clone());
        };

        language_utils::find_language(&self.languages, code)
            .map(|entry| vec![entry.clone()])
            .ok_or_else(|| {
                AppError::Config(format!(
                    "Unknown language code: {}. Available codes: {}",
                    code,
                    self.language_codes().join(", ")
                ))
            })
    }

    /// Configured codes, in table order
    pub fn language_codes(&self) -> Vec<&str> {
        self.languages.iter().map(|l| l.code.as_str()).collect()
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            docs_root: default_docs_root(),
            languages: default_languages(),
            link_prefix: default_link_prefix(),
            project_description: default_project_description(),
            inference: InferenceConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
