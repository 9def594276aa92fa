//! Session state machine.
//!
//! A session is one user's walk from topic to finished article. Its stage is a tagged union and
//! every change goes through [`Stage::apply`], a pure `stage x event -> stage` function. Events
//! that are not legal in the current stage leave it untouched.
//!
//! ```text
//!            submit ok             choose title          publish
//!   Topic ───────────────▶ TitleSelection ───────▶ Drafting ──────▶ Result
//!     ▲  ◀─── back ─────────────┘  ▲  ◀── content failed ──┘          │
//!     │                            └──────────── back ────────────────┘
//!     └──────────────────────────── reset (from anywhere) ─────────────
//! ```

use crate::prompt::PromptKind;
use crate::types::{ArticleArtifact, TitleCandidate, Tone};
use serde::Serialize;

/// Monotonic counter identifying one in-flight request. Bumped by every request and every reset.
pub type GenerationToken = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Topic,
    TitleSelection,
    Drafting,
    Result,
}

impl StageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::Topic => "topic",
            StageKind::TitleSelection => "title_selection",
            StageKind::Drafting => "drafting",
            StageKind::Result => "result",
        }
    }
}

/// Which sub-call of the article stage is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftPhase {
    Content,
    CoverImage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Topic {
        topic: String,
        tone: Tone,
        error: Option<String>,
    },
    TitleSelection {
        topic: String,
        tone: Tone,
        titles: Vec<TitleCandidate>,
        error: Option<String>,
    },
    Drafting {
        topic: String,
        tone: Tone,
        titles: Vec<TitleCandidate>,
        title: TitleCandidate,
        phase: DraftPhase,
    },
    Result {
        topic: String,
        tone: Tone,
        titles: Vec<TitleCandidate>,
        title: TitleCandidate,
        artifact: ArticleArtifact,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ToneSelected(Tone),
    TopicSubmitted { topic: String, tone: Tone },
    TitlesGenerated(Vec<TitleCandidate>),
    TitlesFailed(String),
    TitleChosen(TitleCandidate),
    PhaseAdvanced(DraftPhase),
    ArticlePublished(ArticleArtifact),
    ArticleFailed(String),
    Back,
    Reset { default_tone: Tone },
}

impl Stage {
    pub fn initial(tone: Tone) -> Self {
        Stage::Topic {
            topic: String::new(),
            tone,
            error: None,
        }
    }

    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Topic { .. } => StageKind::Topic,
            Stage::TitleSelection { .. } => StageKind::TitleSelection,
            Stage::Drafting { .. } => StageKind::Drafting,
            Stage::Result { .. } => StageKind::Result,
        }
    }

    /// Whether `event` would change this stage.
    pub fn accepts(&self, event: &Event) -> bool {
        match (self, event) {
            (_, Event::Reset { .. }) => true,
            (Stage::Topic { .. }, Event::ToneSelected(_))
            | (Stage::Topic { .. }, Event::TopicSubmitted { .. })
            | (Stage::Topic { .. }, Event::TitlesFailed(_)) => true,
            (Stage::Topic { .. }, Event::TitlesGenerated(titles)) => !titles.is_empty(),
            (Stage::TitleSelection { .. }, Event::TitleChosen(_))
            | (Stage::TitleSelection { .. }, Event::Back) => true,
            (Stage::Drafting { .. }, Event::PhaseAdvanced(_))
            | (Stage::Drafting { .. }, Event::ArticlePublished(_))
            | (Stage::Drafting { .. }, Event::ArticleFailed(_)) => true,
            (Stage::Result { .. }, Event::Back) => true,
            _ => false,
        }
    }

    /// The transition function.
    pub fn apply(self, event: Event) -> Stage {
        if !self.accepts(&event) {
            return self;
        }
        match (self, event) {
            (_, Event::Reset { default_tone }) => Stage::initial(default_tone),

            (Stage::Topic { topic, error, .. }, Event::ToneSelected(tone)) => {
                Stage::Topic { topic, tone, error }
            }
            (Stage::Topic { .. }, Event::TopicSubmitted { topic, tone }) => Stage::Topic {
                topic,
                tone,
                error: None,
            },
            (Stage::Topic { topic, tone, .. }, Event::TitlesGenerated(titles)) => {
                Stage::TitleSelection {
                    topic,
                    tone,
                    titles,
                    error: None,
                }
            }
            (Stage::Topic { topic, tone, .. }, Event::TitlesFailed(message)) => Stage::Topic {
                topic,
                tone,
                error: Some(message),
            },

            (
                Stage::TitleSelection {
                    topic,
                    tone,
                    titles,
                    ..
                },
                Event::TitleChosen(title),
            ) => Stage::Drafting {
                topic,
                tone,
                titles,
                title,
                phase: DraftPhase::Content,
            },
            (Stage::TitleSelection { topic, tone, .. }, Event::Back) => Stage::Topic {
                topic,
                tone,
                error: None,
            },

            (
                Stage::Drafting {
                    topic,
                    tone,
                    titles,
                    title,
                    ..
                },
                Event::PhaseAdvanced(phase),
            ) => Stage::Drafting {
                topic,
                tone,
                titles,
                title,
                phase,
            },
            (
                Stage::Drafting {
                    topic,
                    tone,
                    titles,
                    title,
                    ..
                },
                Event::ArticlePublished(artifact),
            ) => Stage::Result {
                topic,
                tone,
                titles,
                title,
                artifact,
            },
            (
                Stage::Drafting {
                    topic,
                    tone,
                    titles,
                    ..
                },
                Event::ArticleFailed(message),
            ) => Stage::TitleSelection {
                topic,
                tone,
                titles,
                error: Some(message),
            },

            (
                Stage::Result {
                    topic,
                    tone,
                    titles,
                    ..
                },
                Event::Back,
            ) => Stage::TitleSelection {
                topic,
                tone,
                titles,
                error: None,
            },

            (stage, _) => stage,
        }
    }

    pub fn topic(&self) -> &str {
        match self {
            Stage::Topic { topic, .. }
            | Stage::TitleSelection { topic, .. }
            | Stage::Drafting { topic, .. }
            | Stage::Result { topic, .. } => topic,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Stage::Topic { tone, .. }
            | Stage::TitleSelection { tone, .. }
            | Stage::Drafting { tone, .. }
            | Stage::Result { tone, .. } => *tone,
        }
    }

    pub fn titles(&self) -> &[TitleCandidate] {
        match self {
            Stage::Topic { .. } => &[],
            Stage::TitleSelection { titles, .. }
            | Stage::Drafting { titles, .. }
            | Stage::Result { titles, .. } => titles,
        }
    }

    pub fn selected_title(&self) -> Option<&TitleCandidate> {
        match self {
            Stage::Drafting { title, .. } | Stage::Result { title, .. } => Some(title),
            _ => None,
        }
    }

    pub fn artifact(&self) -> Option<&ArticleArtifact> {
        match self {
            Stage::Result { artifact, .. } => Some(artifact),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Stage::Topic { error, .. } | Stage::TitleSelection { error, .. } => error.as_deref(),
            _ => None,
        }
    }
}

/// The request currently awaiting a response, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InFlight {
    pub token: GenerationToken,
    pub kind: PromptKind,
}

/// One user session: the stage plus the busy flag and generation counter that guard it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    stage: Stage,
    default_tone: Tone,
    in_flight: Option<InFlight>,
    generation: GenerationToken,
}

impl Session {
    pub fn new(default_tone: Tone) -> Self {
        Self {
            stage: Stage::initial(default_tone),
            default_tone,
            in_flight: None,
            generation: 0,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_kind(&self) -> StageKind {
        self.stage.kind()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<InFlight> {
        self.in_flight
    }

    /// Apply an event, returning whether the stage accepted it.
    pub fn apply(&mut self, event: Event) -> bool {
        if !self.stage.accepts(&event) {
            return false;
        }
        let stage = std::mem::replace(&mut self.stage, Stage::initial(self.default_tone));
        self.stage = stage.apply(event);
        true
    }

    /// Mark a request as in flight and hand back its token.
    pub fn begin(&mut self, kind: PromptKind) -> GenerationToken {
        self.generation += 1;
        self.in_flight = Some(InFlight {
            token: self.generation,
            kind,
        });
        self.generation
    }

    /// Whether a response carrying `token` still belongs to this session.
    pub fn is_current(&self, token: GenerationToken) -> bool {
        self.in_flight.map(|f| f.token) == Some(token)
    }

    /// Clear the busy flag if `token` is current. Returns false for stale responses.
    pub fn finish(&mut self, token: GenerationToken) -> bool {
        if self.is_current(token) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Back to the initial stage; abandons any in-flight request.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.apply(Event::Reset {
            default_tone: self.default_tone,
        });
    }

    /// Status line for the presentation layer while a request is running.
    pub fn busy_message(&self) -> Option<&'static str> {
        let in_flight = self.in_flight?;
        Some(match (in_flight.kind, &self.stage) {
            (_, Stage::Drafting { phase: DraftPhase::CoverImage, .. }) => {
                "Creating an exclusive cover image..."
            }
            (PromptKind::Titles, _) => "Analyzing search intent and crafting headline hooks...",
            _ => "Applying SEO techniques, structuring FAQs and writing premium content...",
        })
    }

    pub fn topic(&self) -> &str {
        self.stage.topic()
    }

    pub fn tone(&self) -> Tone {
        self.stage.tone()
    }

    pub fn titles(&self) -> &[TitleCandidate] {
        self.stage.titles()
    }

    pub fn selected_title(&self) -> Option<&TitleCandidate> {
        self.stage.selected_title()
    }

    pub fn artifact(&self) -> Option<&ArticleArtifact> {
        self.stage.artifact()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.stage.error_message()
    }
}
