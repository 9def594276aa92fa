//! CLI domain: parse, route, output, interactive session, and presentation.
//! Single route table dispatches to the orchestrator.

mod interactive;
mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, ConfigCommands};
pub use route::RunContext;
