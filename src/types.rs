//! Core value types shared across the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Voice directive applied uniformly to every prompt of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Expert,
    Casual,
    Persuasive,
    Tutorial,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Expert, Tone::Casual, Tone::Persuasive, Tone::Tutorial];

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Expert => "expert",
            Tone::Casual => "casual",
            Tone::Persuasive => "persuasive",
            Tone::Tutorial => "tutorial",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expert" => Ok(Tone::Expert),
            "casual" => Ok(Tone::Casual),
            "persuasive" => Ok(Tone::Persuasive),
            "tutorial" => Ok(Tone::Tutorial),
            other => Err(format!(
                "unknown tone '{}' (expected one of: expert, casual, persuasive, tutorial)",
                other
            )),
        }
    }
}

/// One AI-proposed headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleCandidate(String);

impl TitleCandidate {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TitleCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The finished deliverable of an article-stage run.
///
/// Built in one piece once the content call has succeeded and the image call has resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleArtifact {
    content: String,
    cover_image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl ArticleArtifact {
    pub fn new(content: String, cover_image_url: Option<String>) -> Self {
        Self {
            content,
            cover_image_url,
            created_at: Utc::now(),
        }
    }

    /// Sanitized HTML fragment.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// `data:image/png;base64,...` URL, absent when image generation failed.
    pub fn cover_image_url(&self) -> Option<&str> {
        self.cover_image_url.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
