//! Project config files: `<workspace>/config/config.toml` and `<workspace>/config/{env}.toml`.
//!
//! The workspace is the directory a blog project lives in (`--workspace`, default `.`). Its
//! files pin the models, prompt language and audience for that blog; credentials usually stay in
//! the environment.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;
use tracing::debug;

const ENV_VAR: &str = "BLOGSMITH_ENV";
const DEFAULT_ENV: &str = "development";

/// Layer the blog project's base file, then the per-environment file, onto `builder`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let config_dir = workspace_root.join("config");
    let env_name = std::env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let candidates = [
        config_dir.join("config.toml"),
        config_dir.join(format!("{}.toml", env_name)),
    ];

    let mut builder = builder;
    for path in candidates {
        if path.exists() {
            debug!(config_path = %path.display(), "Loading project configuration");
            builder = builder.add_source(File::from(path).required(false));
        }
    }
    Ok(builder)
}
