//! Generation Orchestrator
//!
//! Drives a [`Session`] through the two user-visible stages by sequencing prompts, service calls
//! and parsers. The session lock is never held across a network call; every response is checked
//! against the generation token it was issued under before it may touch the session.

use crate::config::BlogsmithConfig;
use crate::error::{ApiError, GenerationError};
use crate::parse::{ArticleContentSanitizer, TitleListParser};
use crate::prompt::{PromptBuilder, PromptKind};
use crate::provider::{ImageGenerationClient, ProviderFactory, TextGenerationClient};
use crate::session::{DraftPhase, Event, GenerationToken, Session, StageKind};
use crate::types::{ArticleArtifact, TitleCandidate, Tone};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const TITLES_ERROR_MESSAGE: &str = "Could not generate titles. Please try again.";
pub const ARTICLE_ERROR_MESSAGE: &str =
    "Error writing the article. The AI service may be overloaded.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Another stage is in flight.
    Busy,
    /// The operation is not offered in the current stage.
    WrongStage(StageKind),
    /// Blank topic or title.
    EmptyInput,
}

/// What an orchestrator operation did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(IgnoreReason),
    /// The stage failed; the session now carries this user-facing message.
    Failed(String),
    /// The session was reset while the request was running; the response was dropped.
    Stale,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

pub struct Orchestrator {
    session: Mutex<Session>,
    prompts: PromptBuilder,
    text: Arc<dyn TextGenerationClient>,
    image: Arc<dyn ImageGenerationClient>,
}

impl Orchestrator {
    pub fn new(
        prompts: PromptBuilder,
        text: Arc<dyn TextGenerationClient>,
        image: Arc<dyn ImageGenerationClient>,
        default_tone: Tone,
    ) -> Self {
        Self {
            session: Mutex::new(Session::new(default_tone)),
            prompts,
            text,
            image,
        }
    }

    /// Build the orchestrator and its HTTP clients from configuration.
    pub fn from_config(config: &BlogsmithConfig) -> Result<Self, ApiError> {
        let default_tone = config
            .generation
            .tone()
            .map_err(ApiError::ConfigError)?;
        if !config.providers.text.has_api_key() {
            warn!("No text generation API key configured; requests are expected to fail");
        }
        if !config.providers.image.has_api_key() {
            warn!("No image generation API key configured; articles will have no cover image");
        }
        Ok(Self::new(
            config.prompt_builder(),
            ProviderFactory::create_text_client(&config.providers.text)?,
            ProviderFactory::create_image_client(&config.providers.image)?,
            default_tone,
        ))
    }

    /// Read-only copy of the session.
    pub fn snapshot(&self) -> Session {
        self.session.lock().clone()
    }

    /// Status line for the request in flight, if any.
    pub fn busy_message(&self) -> Option<&'static str> {
        self.session.lock().busy_message()
    }

    /// Change the tone while still at the topic stage.
    pub fn set_tone(&self, tone: Tone) -> Outcome {
        let mut session = self.session.lock();
        if session.is_busy() {
            return Outcome::Ignored(IgnoreReason::Busy);
        }
        if session.apply(Event::ToneSelected(tone)) {
            Outcome::Applied
        } else {
            Outcome::Ignored(IgnoreReason::WrongStage(session.stage_kind()))
        }
    }

    /// Titles stage: topic + tone -> candidate headlines.
    pub async fn submit_topic(&self, topic: &str, tone: Tone) -> Outcome {
        let token = {
            let mut session = self.session.lock();
            if let Some(reason) = Self::guard(&session, StageKind::Topic) {
                return Outcome::Ignored(reason);
            }
            if topic.trim().is_empty() {
                return Outcome::Ignored(IgnoreReason::EmptyInput);
            }
            session.apply(Event::TopicSubmitted {
                topic: topic.to_string(),
                tone,
            });
            session.begin(PromptKind::Titles)
        };

        info!(token, tone = %tone, "Generating titles");
        let prompt = self.prompts.build(PromptKind::Titles, topic, tone);
        debug!(prompt_chars = prompt.len(), "Built titles prompt");

        let result = match self.text.generate_text(&prompt).await {
            Ok(raw) => TitleListParser::parse(&raw),
            Err(e) => Err(e),
        };

        let mut session = self.session.lock();
        if !session.finish(token) {
            debug!(token, "Discarding titles response from an abandoned request");
            return Outcome::Stale;
        }
        match result {
            Ok(titles) => {
                info!(token, count = titles.len(), "Titles ready");
                session.apply(Event::TitlesGenerated(titles));
                Outcome::Applied
            }
            Err(e) => {
                Self::log_failure(PromptKind::Titles, token, &e);
                session.apply(Event::TitlesFailed(TITLES_ERROR_MESSAGE.to_string()));
                Outcome::Failed(TITLES_ERROR_MESSAGE.to_string())
            }
        }
    }

    /// Article stage: chosen title -> published artifact (content plus optional cover image).
    pub async fn select_title(&self, title: &str) -> Outcome {
        let (token, tone) = {
            let mut session = self.session.lock();
            if let Some(reason) = Self::guard(&session, StageKind::TitleSelection) {
                return Outcome::Ignored(reason);
            }
            if title.trim().is_empty() {
                return Outcome::Ignored(IgnoreReason::EmptyInput);
            }
            session.apply(Event::TitleChosen(TitleCandidate::new(title)));
            (session.begin(PromptKind::Article), session.tone())
        };

        info!(token, tone = %tone, "Drafting article");
        let prompt = self.prompts.build(PromptKind::Article, title, tone);
        debug!(prompt_chars = prompt.len(), "Built article prompt");

        let content = match self.text.generate_text(&prompt).await {
            Ok(raw) => ArticleContentSanitizer::sanitize(&raw),
            Err(e) => Err(e),
        };

        let content = match content {
            Ok(content) => content,
            Err(e) => {
                let mut session = self.session.lock();
                if !session.finish(token) {
                    debug!(token, "Discarding article failure from an abandoned request");
                    return Outcome::Stale;
                }
                Self::log_failure(PromptKind::Article, token, &e);
                session.apply(Event::ArticleFailed(ARTICLE_ERROR_MESSAGE.to_string()));
                return Outcome::Failed(ARTICLE_ERROR_MESSAGE.to_string());
            }
        };

        {
            let mut session = self.session.lock();
            if !session.is_current(token) {
                debug!(token, "Abandoned before cover image; dropping article");
                return Outcome::Stale;
            }
            session.apply(Event::PhaseAdvanced(DraftPhase::CoverImage));
        }

        let cover_image_url = self
            .image
            .generate_image(&self.prompts.build(PromptKind::Image, title, tone))
            .await;
        if cover_image_url.is_none() {
            info!(token, "Publishing article without a cover image");
        }

        let mut session = self.session.lock();
        if !session.finish(token) {
            debug!(token, "Discarding article from an abandoned request");
            return Outcome::Stale;
        }
        let artifact = ArticleArtifact::new(content, cover_image_url);
        info!(token, created_at = %artifact.created_at(), "Article published");
        session.apply(Event::ArticlePublished(artifact));
        Outcome::Applied
    }

    /// Step back one stage: selection -> topic, result -> selection.
    pub fn back(&self) -> Outcome {
        let mut session = self.session.lock();
        if session.is_busy() {
            return Outcome::Ignored(IgnoreReason::Busy);
        }
        if session.apply(Event::Back) {
            Outcome::Applied
        } else {
            Outcome::Ignored(IgnoreReason::WrongStage(session.stage_kind()))
        }
    }

    /// Start over. Always accepted; abandons anything in flight.
    pub fn reset(&self) -> Outcome {
        let mut session = self.session.lock();
        if let Some(in_flight) = session.in_flight() {
            info!(token = in_flight.token, "Reset abandons in-flight request");
        }
        session.reset();
        Outcome::Applied
    }

    fn guard(session: &Session, expected: StageKind) -> Option<IgnoreReason> {
        if session.is_busy() {
            return Some(IgnoreReason::Busy);
        }
        let current = session.stage_kind();
        if current != expected {
            return Some(IgnoreReason::WrongStage(current));
        }
        None
    }

    fn log_failure(stage: PromptKind, token: GenerationToken, error: &GenerationError) {
        warn!(
            stage = stage.as_str(),
            token,
            kind = error.kind(),
            error = %error,
            "Generation stage failed"
        );
    }
}
