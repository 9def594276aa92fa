//! Environment source: BLOGSMITH__SECTION__KEY variables plus short credential aliases.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Short aliases for the two credentials, applied last.
const CREDENTIAL_ALIASES: [(&str, &str); 2] = [
    ("BLOGSMITH_TEXT_API_KEY", "providers.text.api_key"),
    ("BLOGSMITH_IMAGE_API_KEY", "providers.image.api_key"),
];

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut builder = builder.add_source(
        Environment::with_prefix("BLOGSMITH")
            .prefix_separator("__")
            .separator("__"),
    );
    for (var, key) in CREDENTIAL_ALIASES {
        builder = builder.set_override_option(key, std::env::var(var).ok())?;
    }
    Ok(builder)
}
