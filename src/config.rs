//! Environment configuration for cifix
//!
//! # Environment Variables
//!
//! - `CIFIX_PROVIDER`: reasoning provider (openai|anthropic|gemini|groq|xai|ollama) - default: "openai"
//! - `CIFIX_MODEL`: model name - default depends on the provider
//! - `CIFIX_API_BASE_URL`: optional custom endpoint for the provider
//! - `CIFIX_REQUEST_TIMEOUT`: per-run timeout in seconds - default: "300"
//! - `CIFIX_THREAD_DIR`: where thread transcripts are kept - default: `<data dir>/cifix/threads`
//! - `CIFIX_CORRELATION_ID`: correlation id shared by every log line of one
//!   invocation - default: a fresh UUID (see [`correlation_id_from_env`])
//!
//! The API credential is read from the provider's standard variable
//! (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GEMINI_API_KEY`, ...). It is
//! required for every provider except Ollama.

use genai::adapter::AdapterKind;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PROVIDER: &str = "openai";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 3600;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing API credential: set the {var} environment variable")]
    MissingCredential { var: String },

    #[error("Invalid provider: {0}. Valid options: openai, anthropic, gemini, groq, xai, ollama")]
    InvalidProvider(String),

    #[error("No default model for provider {0}; set CIFIX_MODEL")]
    MissingModel(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone)]
pub struct CifixConfig {
    pub provider: AdapterKind,
    pub model: String,
    pub api_base_url: Option<String>,
    pub request_timeout_secs: u64,
    pub thread_dir: PathBuf,
}

fn default_model(provider: AdapterKind) -> Option<&'static str> {
    match provider {
        AdapterKind::OpenAI => Some("gpt-4o-mini"),
        AdapterKind::Anthropic => Some("claude-3-5-haiku-latest"),
        AdapterKind::Gemini => Some("gemini-2.0-flash"),
        AdapterKind::Groq => Some("llama-3.3-70b-versatile"),
        AdapterKind::Xai => Some("grok-3-mini"),
        AdapterKind::Ollama => Some("qwen2.5-coder:7b"),
        _ => None,
    }
}

fn default_thread_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join("cifix")
        .join("threads")
}

/// Reads the correlation id from `CIFIX_CORRELATION_ID`, or generates one
pub fn correlation_id_from_env() -> String {
    correlation_id_from(|key| env::var(key).ok())
}

fn correlation_id_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    lookup("CIFIX_CORRELATION_ID")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

impl CifixConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` when the provider needs an API
    /// key and its variable is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let provider_name = lookup("CIFIX_PROVIDER")
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string())
            .to_lowercase();
        let provider = AdapterKind::from_lower_str(&provider_name)
            .ok_or_else(|| ConfigError::InvalidProvider(provider_name.clone()))?;

        if let Some(var) = provider.default_key_env_name() {
            let present = lookup(var).map(|v| !v.trim().is_empty()).unwrap_or(false);
            if !present {
                return Err(ConfigError::MissingCredential {
                    var: var.to_string(),
                });
            }
        }

        let model = match lookup("CIFIX_MODEL").filter(|m| !m.trim().is_empty()) {
            Some(model) => model,
            None => default_model(provider)
                .ok_or_else(|| ConfigError::MissingModel(provider.as_str().to_string()))?
                .to_string(),
        };

        let request_timeout_secs = match lookup("CIFIX_REQUEST_TIMEOUT") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::ParseError {
                field: "CIFIX_REQUEST_TIMEOUT".to_string(),
                error: e.to_string(),
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let thread_dir = lookup("CIFIX_THREAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_thread_dir);

        let config = Self {
            provider,
            model,
            api_base_url: lookup("CIFIX_API_BASE_URL").filter(|u| !u.trim().is_empty()),
            request_timeout_secs,
            thread_dir,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 1 hour".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
