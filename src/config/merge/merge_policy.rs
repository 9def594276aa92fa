//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_LANGUAGE: &str = "English";
pub const DEFAULT_AUDIENCE: &str = "modern online readers";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("providers.text.api_key", "")?
        .set_default("providers.text.model", DEFAULT_TEXT_MODEL)?
        .set_default("providers.text.base_url", DEFAULT_BASE_URL)?
        .set_default("providers.image.api_key", "")?
        .set_default("providers.image.model", DEFAULT_IMAGE_MODEL)?
        .set_default("providers.image.base_url", DEFAULT_BASE_URL)?
        .set_default("generation.language", DEFAULT_LANGUAGE)?
        .set_default("generation.audience", DEFAULT_AUDIENCE)?
        .set_default("generation.default_tone", "expert")
}
