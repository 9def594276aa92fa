//! Text generation over the `generateContent` endpoint.

use super::{
    build_endpoint, build_provider_http_client, extract_api_error, map_http_error,
    TextGenerationClient,
};
use crate::config::ServiceConfig;
use crate::error::{ApiError, GenerationError};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if every step of the path is present.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Gemini `generateContent` client
pub struct GeminiTextClient {
    client: Client,
    endpoint: Url,
    model: String,
}

impl GeminiTextClient {
    pub fn new(service: &ServiceConfig) -> Result<Self, ApiError> {
        let client = build_provider_http_client(service.timeout_secs.map(Duration::from_secs))?;
        let endpoint = build_endpoint(service, "generateContent")?;
        Ok(Self {
            client,
            endpoint,
            model: service.model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerationClient for GeminiTextClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "Sending text generation request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_http_error)?;

        if !status.is_success() {
            return Err(GenerationError::HttpStatus {
                status: status.as_u16(),
                message: extract_api_error(&body),
            });
        }

        match serde_json::from_str::<GenerateContentResponse>(&body) {
            Ok(parsed) => Ok(parsed.into_text().unwrap_or_default()),
            Err(e) => {
                warn!(model = %self.model, error = %e, "Text response body was not the expected JSON");
                Ok(String::new())
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
