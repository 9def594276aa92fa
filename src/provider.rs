//! Generation Service Clients
//!
//! The two external services the pipeline talks to: a text model (titles, article markup) and an
//! image model (cover art). Each sits behind a trait so the orchestrator can be driven by any
//! implementation; the shipped ones speak the Google Generative Language REST API.

use crate::config::ServiceConfig;
use crate::error::{ApiError, GenerationError};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub mod image;
pub mod text;

pub use image::ImagenClient;
pub use text::GeminiTextClient;

/// One text-generation round-trip.
#[async_trait]
pub trait TextGenerationClient: Send + Sync {
    /// Send `prompt` and return the generated text.
    ///
    /// A successful response without extractable text yields `Ok(String::new())`.
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// One image-generation round-trip. Best effort: every failure becomes `None`.
#[async_trait]
pub trait ImageGenerationClient: Send + Sync {
    /// Send `prompt` and return a `data:` URL for the generated image.
    async fn generate_image(&self, prompt: &str) -> Option<String>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

// Helper function to map transport-level reqwest errors to GenerationError.
// The URL is dropped because it carries the API key as a query parameter.
pub(crate) fn map_http_error(error: reqwest::Error) -> GenerationError {
    let error = error.without_url();
    if let Some(status) = error.status() {
        GenerationError::HttpStatus {
            status: status.as_u16(),
            message: error.to_string(),
        }
    } else if error.is_timeout() {
        GenerationError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        GenerationError::Transport(format!("Connection error: {}", error))
    } else {
        GenerationError::Transport(format!("HTTP error: {}", error))
    }
}

/// Pull a human-readable message out of a Google API error envelope, falling back to the body.
pub(crate) fn extract_api_error(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: Option<ErrorBody>,
    }
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        status: Option<String>,
    }

    if let Ok(ErrorEnvelope { error: Some(err) }) = serde_json::from_str::<ErrorEnvelope>(body) {
        let message = err.message.unwrap_or_else(|| "unknown error".to_string());
        return match err.status {
            Some(status) => format!("{} ({})", message, status),
            None => message,
        };
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error body".to_string()
    } else {
        trimmed.to_string()
    }
}

const PROVIDER_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn build_provider_http_client(timeout: Option<Duration>) -> Result<Client, ApiError> {
    let mut builder = Client::builder()
        .no_proxy()
        .connect_timeout(PROVIDER_HTTP_CONNECT_TIMEOUT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ApiError::ProviderError(format!("Failed to create HTTP client: {}", e)))
}

/// Build `{base_url}/models/{model}:{action}?key={api_key}`.
pub(crate) fn build_endpoint(
    service: &ServiceConfig,
    action: &str,
) -> Result<Url, ApiError> {
    let model_path = if service.model.starts_with("models/") {
        service.model.clone()
    } else {
        format!("models/{}", service.model)
    };
    let endpoint = format!(
        "{}/{}:{}",
        service.base_url.trim_end_matches('/'),
        model_path,
        action
    );
    let mut url = Url::parse(&endpoint).map_err(|e| {
        ApiError::ConfigError(format!("Invalid endpoint URL '{}': {}", endpoint, e))
    })?;
    url.query_pairs_mut().append_pair("key", &service.api_key);
    Ok(url)
}

/// Provider factory for creating the configured clients
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create_text_client(
        service: &ServiceConfig,
    ) -> Result<Arc<dyn TextGenerationClient>, ApiError> {
        Ok(Arc::new(GeminiTextClient::new(service)?))
    }

    pub fn create_image_client(
        service: &ServiceConfig,
    ) -> Result<Arc<dyn ImageGenerationClient>, ApiError> {
        Ok(Arc::new(ImagenClient::new(service)?))
    }
}
