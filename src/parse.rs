//! Parsing of semi-structured model output.
//!
//! Models routinely wrap their answers in markdown code fences even when told not to, so both
//! parsers start by removing fence markers.

use crate::error::GenerationError;
use crate::prompt::REQUESTED_TITLE_COUNT;
use crate::types::TitleCandidate;
use serde_json::Value;
use tracing::warn;

/// Remove a wrapping fence (```` ```json ````, ```` ```html ````, bare ```` ``` ````) and trim.
///
/// Only a fence on the first line and a closing fence at the very end are removed.
pub fn strip_wrapping_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string (language tag) up to the end of the opening line.
        text = match rest.find('\n') {
            Some(idx) if rest[..idx].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
                &rest[idx + 1..]
            }
            Some(_) => rest,
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Turns the titles-stage response into an ordered candidate list.
pub struct TitleListParser;

impl TitleListParser {
    pub fn parse(raw: &str) -> Result<Vec<TitleCandidate>, GenerationError> {
        let cleaned = strip_wrapping_fence(raw);
        if cleaned.is_empty() {
            return Err(GenerationError::EmptyResponse(
                "titles response contained no text".to_string(),
            ));
        }

        let value: Value = serde_json::from_str(cleaned)
            .map_err(|e| GenerationError::Parse(format!("titles response is not JSON: {}", e)))?;

        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(GenerationError::Parse(format!(
                    "titles response is not a JSON array (got {})",
                    json_type_name(&other)
                )))
            }
        };

        if items.is_empty() {
            return Err(GenerationError::Parse(
                "titles response is an empty array".to_string(),
            ));
        }

        if items.len() != REQUESTED_TITLE_COUNT {
            warn!(
                expected = REQUESTED_TITLE_COUNT,
                received = items.len(),
                "Title count differs from the requested amount; accepting as-is"
            );
        }

        Ok(items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => TitleCandidate::new(text),
                other => TitleCandidate::new(other.to_string()),
            })
            .collect())
    }
}

/// Cleans the article-stage response into an HTML fragment.
///
/// Removes code-fence markers only. The markup itself is trusted and passed through unescaped.
pub struct ArticleContentSanitizer;

impl ArticleContentSanitizer {
    pub fn sanitize(raw: &str) -> Result<String, GenerationError> {
        let content = raw.replace("```html", "").replace("```", "");
        let content = content.trim();
        if content.is_empty() {
            return Err(GenerationError::EmptyResponse(
                "article response contained no content".to_string(),
            ));
        }
        Ok(content.to_string())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
