//! CLI presentation: text/json rendering of titles, outcomes and configuration.

use crate::config::{redact, BlogsmithConfig, ValidationError};
use crate::error::ApiError;
use crate::types::{ArticleArtifact, TitleCandidate, Tone};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

pub fn format_titles_text(titles: &[TitleCandidate]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Title"]);
    for (index, title) in titles.iter().enumerate() {
        table.add_row(vec![(index + 1).to_string(), title.to_string()]);
    }
    table.to_string()
}

pub fn format_titles_json(
    topic: &str,
    tone: Tone,
    titles: &[TitleCandidate],
) -> Result<String, ApiError> {
    let out = json!({
        "topic": topic,
        "tone": tone,
        "titles": titles,
        "total": titles.len(),
    });
    serde_json::to_string_pretty(&out)
        .map_err(|e| ApiError::GenerationFailed(format!("Failed to render titles: {}", e)))
}

pub fn format_error_line(message: &str) -> String {
    format!("{} {}", "error:".red().bold(), message)
}

pub fn format_status_line(message: &str) -> String {
    format!("{}", message.dimmed())
}

pub fn format_saved(path: &std::path::Path, artifact: &ArticleArtifact) -> String {
    let cover = if artifact.cover_image_url().is_some() {
        "with cover image"
    } else {
        "without cover image"
    };
    format!(
        "{} Article saved to {} ({}, generated {})",
        "✓".green(),
        path.display(),
        cover,
        artifact.created_at().format("%Y-%m-%d %H:%M:%S UTC")
    )
}

pub fn format_config_text(
    config: &BlogsmithConfig,
    validation: &Result<(), Vec<ValidationError>>,
) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Service", "Model", "Base URL", "API key", "Timeout"]);
    for (name, service) in [
        ("text", &config.providers.text),
        ("image", &config.providers.image),
    ] {
        table.add_row(vec![
            name.to_string(),
            service.model.clone(),
            service.base_url.clone(),
            redact(&service.api_key).to_string(),
            service
                .timeout_secs
                .map(|s| format!("{}s", s))
                .unwrap_or_else(|| "(transport default)".to_string()),
        ]);
    }

    let mut output = table.to_string();
    output.push_str(&format!(
        "\n\nLanguage: {}\nAudience: {}\nDefault tone: {}\nLogging: {} / {} / {}\n",
        config.generation.language,
        config.generation.audience,
        config.generation.default_tone,
        config.logging.level,
        config.logging.format,
        config.logging.output,
    ));
    output.push_str(&format_validation(validation));
    output
}

pub fn format_config_json(
    config: &BlogsmithConfig,
    validation: &Result<(), Vec<ValidationError>>,
) -> Result<String, ApiError> {
    let service = |s: &crate::config::ServiceConfig| {
        json!({
            "model": s.model,
            "base_url": s.base_url,
            "api_key": redact(&s.api_key),
            "timeout_secs": s.timeout_secs,
        })
    };
    let errors: Vec<String> = match validation {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    };
    let out = json!({
        "providers": {
            "text": service(&config.providers.text),
            "image": service(&config.providers.image),
        },
        "generation": config.generation,
        "logging": config.logging,
        "valid": errors.is_empty(),
        "errors": errors,
    });
    serde_json::to_string_pretty(&out)
        .map_err(|e| ApiError::ConfigError(format!("Failed to render configuration: {}", e)))
}

pub fn format_validation(validation: &Result<(), Vec<ValidationError>>) -> String {
    match validation {
        Ok(()) => format!("{} Configuration is valid\n", "✓".green()),
        Err(errors) => {
            let mut output = format!(
                "{} Configuration has {} error(s):\n",
                "✗".red(),
                errors.len()
            );
            for error in errors {
                output.push_str(&format!("  - {}\n", error));
            }
            output
        }
    }
}
