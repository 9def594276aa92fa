//! Cover image generation over the `predict` endpoint.

use super::{build_endpoint, build_provider_http_client, extract_api_error, ImageGenerationClient};
use crate::config::ServiceConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
struct Prediction {
    #[serde(rename = "bytesBase64Encoded")]
    bytes_base64_encoded: Option<String>,
}

/// Imagen `predict` client
pub struct ImagenClient {
    client: Client,
    endpoint: Url,
    model: String,
}

impl ImagenClient {
    pub fn new(service: &ServiceConfig) -> Result<Self, ApiError> {
        let client = build_provider_http_client(service.timeout_secs.map(Duration::from_secs))?;
        let endpoint = build_endpoint(service, "predict")?;
        Ok(Self {
            client,
            endpoint,
            model: service.model.clone(),
        })
    }
}

#[async_trait]
impl ImageGenerationClient for ImagenClient {
    async fn generate_image(&self, prompt: &str) -> Option<String> {
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": { "sampleCount": 1 },
        });

        debug!(model = %self.model, "Sending image generation request");

        let response = match self.client.post(self.endpoint.clone()).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(model = %self.model, error = %e.without_url(), "Image generation request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(
                model = %self.model,
                status = status.as_u16(),
                error = %extract_api_error(&error_text),
                "Image generation returned non-success status"
            );
            return None;
        }

        let parsed: PredictResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(model = %self.model, error = %e.without_url(), "Image response body was not the expected JSON");
                return None;
            }
        };

        match parsed
            .predictions
            .into_iter()
            .next()
            .and_then(|p| p.bytes_base64_encoded)
            .filter(|b64| !b64.is_empty())
        {
            Some(b64) => Some(format!("{}{}", DATA_URL_PREFIX, b64)),
            None => {
                warn!(model = %self.model, "Image response carried no image bytes");
                None
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
