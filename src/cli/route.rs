//! CLI route: single route table and run context. Dispatches to the orchestrator and presentation.

use crate::cli::interactive;
use crate::cli::parse::{Commands, ConfigCommands};
use crate::cli::presentation::{
    format_config_json, format_config_text, format_saved, format_titles_json, format_titles_text,
    format_validation,
};
use crate::config::{BlogsmithConfig, ConfigLoader};
use crate::error::ApiError;
use crate::export::export_session;
use crate::orchestrator::{IgnoreReason, Orchestrator, Outcome};
use crate::types::{ArticleArtifact, Tone};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing::info;

/// Runtime context for CLI execution: loaded configuration and the async runtime.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    config: BlogsmithConfig,
    runtime: Runtime,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::with_config(config)
    }

    pub fn with_config(config: BlogsmithConfig) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to create async runtime: {}", e)))?;
        Ok(Self { config, runtime })
    }

    pub fn config(&self) -> &BlogsmithConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Write { output } => {
                let orchestrator = self.orchestrator()?;
                interactive::run(&self.runtime, &orchestrator, output.as_deref())
            }
            Commands::Titles {
                topic,
                tone,
                format,
            } => self.handle_titles(topic, *tone, format),
            Commands::Generate {
                topic,
                tone,
                pick,
                output,
            } => self.handle_generate(topic, *tone, *pick, output.as_deref()),
            Commands::Config { command } => self.handle_config_command(command),
        }
    }

    fn orchestrator(&self) -> Result<Orchestrator, ApiError> {
        self.config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Orchestrator::from_config(&self.config)
    }

    fn handle_titles(&self, topic: &str, tone: Option<Tone>, format: &str) -> Result<String, ApiError> {
        let orchestrator = self.orchestrator()?;
        let tone = tone.unwrap_or_else(|| orchestrator.snapshot().tone());
        let outcome = self.runtime.block_on(orchestrator.submit_topic(topic, tone));
        expect_applied(outcome)?;

        let snapshot = orchestrator.snapshot();
        if format == "json" {
            format_titles_json(snapshot.topic(), snapshot.tone(), snapshot.titles())
        } else {
            Ok(format_titles_text(snapshot.titles()))
        }
    }

    fn handle_generate(
        &self,
        topic: &str,
        tone: Option<Tone>,
        pick: usize,
        output: Option<&Path>,
    ) -> Result<String, ApiError> {
        let orchestrator = self.orchestrator()?;
        let tone = tone.unwrap_or_else(|| orchestrator.snapshot().tone());
        expect_applied(self.runtime.block_on(orchestrator.submit_topic(topic, tone)))?;

        let titles = orchestrator.snapshot().titles().to_vec();
        let title = pick
            .checked_sub(1)
            .and_then(|index| titles.get(index))
            .ok_or_else(|| {
                ApiError::InvalidInput(format!(
                    "--pick must be between 1 and {} (got {})",
                    titles.len(),
                    pick
                ))
            })?;
        info!(pick, title = %title, "Selected title");

        expect_applied(self.runtime.block_on(orchestrator.select_title(title.as_str())))?;

        let snapshot = orchestrator.snapshot();
        let html = export_session(&snapshot).ok_or_else(|| {
            ApiError::GenerationFailed("article stage finished without an article".to_string())
        })?;
        let artifact = snapshot.artifact().ok_or_else(|| {
            ApiError::GenerationFailed("article stage finished without an article".to_string())
        })?;
        deliver(&html, output, artifact)
    }

    fn handle_config_command(&self, command: &ConfigCommands) -> Result<String, ApiError> {
        let validation = self.config.validate();
        match command {
            ConfigCommands::Show { format } => {
                if format == "json" {
                    format_config_json(&self.config, &validation)
                } else {
                    Ok(format_config_text(&self.config, &validation))
                }
            }
            ConfigCommands::Validate => {
                let text = format_validation(&validation);
                match validation {
                    Ok(()) => Ok(text),
                    Err(_) => Err(ApiError::ConfigError(text.trim_end().to_string())),
                }
            }
        }
    }
}

/// Write the exported article to `output`, or hand it back for stdout.
pub(crate) fn deliver(
    html: &str,
    output: Option<&Path>,
    artifact: &ArticleArtifact,
) -> Result<String, ApiError> {
    match output {
        Some(path) => {
            std::fs::write(path, html)?;
            info!(path = %path.display(), "Article written");
            Ok(format_saved(path, artifact))
        }
        None => Ok(html.to_string()),
    }
}

fn expect_applied(outcome: Outcome) -> Result<(), ApiError> {
    match outcome {
        Outcome::Applied => Ok(()),
        Outcome::Failed(message) => Err(ApiError::GenerationFailed(message)),
        Outcome::Ignored(IgnoreReason::EmptyInput) => Err(ApiError::InvalidInput(
            "input must not be empty".to_string(),
        )),
        Outcome::Ignored(reason) => Err(ApiError::GenerationFailed(format!(
            "request was not accepted: {:?}",
            reason
        ))),
        Outcome::Stale => Err(ApiError::GenerationFailed(
            "request was abandoned".to_string(),
        )),
    }
}
