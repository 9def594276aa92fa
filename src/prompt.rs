//! Prompt construction for the three generation calls.
//!
//! Everything here is pure string assembly. Topic and title text are embedded verbatim; callers
//! rely on finding them as literal substrings of the resulting prompt.

use crate::types::Tone;
use serde::{Deserialize, Serialize};

/// Minimum article length requested from the writer model.
pub const MIN_ARTICLE_WORDS: u32 = 800;

/// Number of headlines requested per titles call.
pub const REQUESTED_TITLE_COUNT: usize = 5;

const META_DESCRIPTION_STYLE: &str = "background-color: #f3f4f6; padding: 15px; border-radius: 8px; margin-bottom: 20px; font-style: italic; color: #555; border-left: 4px solid #6366f1;";

/// Which call a prompt is destined for. Also used as the stage tag in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    Titles,
    Article,
    Image,
}

impl PromptKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PromptKind::Titles => "titles",
            PromptKind::Article => "article",
            PromptKind::Image => "image",
        }
    }
}

/// Session-independent context folded into every prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBuilder {
    language: String,
    audience: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new("English", "modern online readers")
    }
}

impl PromptBuilder {
    pub fn new(language: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            audience: audience.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Dispatch on the prompt kind. `subject` is the topic for titles, the chosen title otherwise.
    pub fn build(&self, kind: PromptKind, subject: &str, tone: Tone) -> String {
        match kind {
            PromptKind::Titles => self.titles_prompt(subject, tone),
            PromptKind::Article => self.article_prompt(subject, tone),
            PromptKind::Image => self.image_prompt(subject),
        }
    }

    pub fn titles_prompt(&self, topic: &str, tone: Tone) -> String {
        format!(
            r#"Act as a senior content strategist.
The user wants to write about: "{topic}".
Target audience: {audience}.
Desired tone of voice: {tone}.

Generate exactly {count} highly magnetic titles, optimized for search intent and click-through rate (CTR).
Use mental triggers (curiosity, urgency, benefit, list).

Return ONLY a pure JSON array of strings.
Example: ["Title 1", "Title 2"]"#,
            topic = topic,
            audience = self.audience,
            tone = tone,
            count = REQUESTED_TITLE_COUNT,
        )
    }

    pub fn article_prompt(&self, title: &str, tone: Tone) -> String {
        format!(
            r#"You are a Senior Copywriter and SEO Specialist with 10 years of experience.
Your task is to write a high-conversion blog article about: "{title}".

Settings:
- Tone of voice: {tone} (keep it fully consistent).
- Language: {language} (natural and fluent, never sounding translated).
- Length: Minimum {min_words} words.

Mandatory HTML structure (return ONLY the HTML that goes inside <body>, without <html> or <body> tags):

1. **Meta Description**: A short italic paragraph at the top, focused on SEO, inside a div styled with style="{meta_style}".

2. **Hook Introduction**: Open with a question, a statistic or a bold claim that grabs the reader.

3. **Key Takeaways**: Right after the introduction, a highlight box (a nicely styled <ul>) summarizing what the reader will learn.

4. **Body (Deep Dive)**:
   - Use <h2> for main topics and <h3> for subtopics.
   - Use <strong>bold</strong> to emphasize keywords and impactful phrases (sparingly).
   - Keep paragraphs short for scannability.
   - Include practical examples or analogies.

5. **FAQ Section**: Add exactly 3 common questions about the subject with direct answers (great for search snippets).

6. **Conclusion and CTA**: Close with a motivating summary and a question that invites readers to comment.

IMPORTANT: Do not repeat the H1 title at the beginning. The content must be rich and actionable, and must avoid AI cliches such as "In today's digital landscape...". Be specific and human."#,
            title = title,
            tone = tone,
            language = self.language,
            min_words = MIN_ARTICLE_WORDS,
            meta_style = META_DESCRIPTION_STYLE,
        )
    }

    pub fn image_prompt(&self, title: &str) -> String {
        format!(
            "High quality, modern, blog header image for an article titled \"{}\". Style: Minimalist, professional, vibrant colors, 4k. No text.",
            title
        )
    }
}
