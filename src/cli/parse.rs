//! CLI parse: clap types for Blogsmith. No behavior; definitions only.

use crate::types::Tone;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Blogsmith CLI - topic in, illustrated blog article out
#[derive(Parser)]
#[command(name = "blogsmith")]
#[command(about = "Generate SEO-structured, illustrated blog articles from a topic")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (config/config.toml is read from here)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive session: topic, tone, title, article
    Write {
        /// Save the exported article here instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate headline candidates for a topic
    Titles {
        /// What the article is about
        #[arg(long)]
        topic: String,
        /// Voice of the article (expert, casual, persuasive, tutorial)
        #[arg(long)]
        tone: Option<Tone>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Run the whole pipeline without prompts
    Generate {
        /// What the article is about
        #[arg(long)]
        topic: String,
        /// Voice of the article (expert, casual, persuasive, tutorial)
        #[arg(long)]
        tone: Option<Tone>,
        /// 1-based index of the headline to draft
        #[arg(long, default_value = "1")]
        pick: usize,
        /// Save the exported article here instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration (credentials redacted)
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Validate the effective configuration
    Validate,
}
