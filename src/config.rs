//! Configuration System
//!
//! Layered configuration for provider credentials, prompt context and logging. Credentials are
//! only ever read from files or the environment at runtime.

use crate::logging::{validate_logging_config, LoggingConfig};
use crate::prompt::PromptBuilder;
use crate::types::Tone;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

mod facade;
mod merge {
    pub mod merge_policy;
}
mod sources {
    pub mod environment;
    pub mod global_file;
    pub mod workspace_file;
}

pub use facade::ConfigLoader;
pub use merge::merge_policy::{
    DEFAULT_AUDIENCE, DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_LANGUAGE, DEFAULT_TEXT_MODEL,
};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogsmithConfig {
    /// Generation service endpoints and credentials
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Prompt context
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub text: ServiceConfig,
    pub image: ServiceConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            text: ServiceConfig::new(DEFAULT_TEXT_MODEL),
            image: ServiceConfig::new(DEFAULT_IMAGE_MODEL),
        }
    }
}

/// One external generation service.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Passed as the `key` query parameter; may be empty
    #[serde(default)]
    pub api_key: String,

    pub model: String,

    pub base_url: String,

    /// Whole-request timeout; unset means the transport default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ServiceConfig {
    pub fn new(model: &str) -> Self {
        Self {
            api_key: String::new(),
            model: model.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Validate service configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }
        let parsed = Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid base_url '{}': {}", self.base_url, e))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(format!(
                "base_url must use http or https, got '{}'",
                parsed.scheme()
            ));
        }
        if self.timeout_secs == Some(0) {
            return Err("timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Render a credential for display without revealing it.
pub fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

/// Prompt context settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_audience")]
    pub audience: String,

    /// Tone pre-selected at the topic stage, kept as text so a typo surfaces in validation
    #[serde(default = "default_tone")]
    pub default_tone: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_audience() -> String {
    DEFAULT_AUDIENCE.to_string()
}

fn default_tone() -> String {
    Tone::default().to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            audience: default_audience(),
            default_tone: default_tone(),
        }
    }
}

impl GenerationConfig {
    pub fn tone(&self) -> Result<Tone, String> {
        self.default_tone.parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.language.trim().is_empty() {
            return Err("language cannot be empty".to_string());
        }
        self.tone().map(|_| ())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Provider(String, String),
    Generation(String),
    Logging(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Provider(name, msg) => {
                write!(f, "Provider '{}': {}", name, msg)
            }
            ValidationError::Generation(msg) => {
                write!(f, "Generation: {}", msg)
            }
            ValidationError::Logging(msg) => {
                write!(f, "Logging: {}", msg)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl BlogsmithConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (name, service) in [("text", &self.providers.text), ("image", &self.providers.image)] {
            if let Err(e) = service.validate() {
                errors.push(ValidationError::Provider(name.to_string(), e));
            }
        }

        if let Err(e) = self.generation.validate() {
            errors.push(ValidationError::Generation(e));
        }

        if let Err(e) = validate_logging_config(&self.logging) {
            errors.push(ValidationError::Logging(e.to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn prompt_builder(&self) -> PromptBuilder {
        PromptBuilder::new(&self.generation.language, &self.generation.audience)
    }
}
