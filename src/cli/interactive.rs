//! Interactive session: walks the user through topic, tone, title and result with prompts.

use crate::cli::presentation::{format_error_line, format_status_line};
use crate::cli::route::deliver;
use crate::error::ApiError;
use crate::export::export_session;
use crate::orchestrator::{Orchestrator, Outcome};
use crate::session::{Stage, StageKind};
use crate::types::Tone;
use dialoguer::{Input, Select};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::debug;

const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(150);

fn input_error(e: dialoguer::Error) -> ApiError {
    ApiError::InvalidInput(format!("Failed to get user input: {}", e))
}

/// Run until the user quits. Returns the text to print on exit.
pub fn run(
    runtime: &Runtime,
    orchestrator: &Orchestrator,
    output: Option<&Path>,
) -> Result<String, ApiError> {
    loop {
        let snapshot = orchestrator.snapshot();
        if let Some(error) = snapshot.error_message() {
            eprintln!("{}", format_error_line(error));
        }

        match snapshot.stage_kind() {
            StageKind::Topic => {
                let topic: String = Input::new()
                    .with_prompt("What do you want to write about?")
                    .with_initial_text(snapshot.topic())
                    .allow_empty(true)
                    .interact_text()
                    .map_err(input_error)?;
                if topic.trim().is_empty() {
                    eprintln!("{}", format_error_line("Please enter a topic."));
                    continue;
                }

                let tone_index = Tone::ALL
                    .iter()
                    .position(|t| *t == snapshot.tone())
                    .unwrap_or(0);
                let choice = Select::new()
                    .with_prompt("Tone of voice")
                    .items(&Tone::ALL)
                    .default(tone_index)
                    .interact()
                    .map_err(input_error)?;
                let tone = Tone::ALL[choice];
                orchestrator.set_tone(tone);

                report(run_with_status(
                    runtime,
                    orchestrator,
                    orchestrator.submit_topic(&topic, tone),
                ));
            }
            StageKind::TitleSelection => {
                let titles = snapshot.titles();
                let mut items: Vec<String> = titles.iter().map(|t| t.to_string()).collect();
                items.push("← Change topic".to_string());
                items.push("↺ Start over".to_string());

                let choice = Select::new()
                    .with_prompt(format!(
                        "Pick a headline ({} options, tone \"{}\")",
                        titles.len(),
                        snapshot.tone()
                    ))
                    .items(&items)
                    .default(0)
                    .interact()
                    .map_err(input_error)?;

                if let Some(title) = titles.get(choice) {
                    report(run_with_status(
                        runtime,
                        orchestrator,
                        orchestrator.select_title(title.as_str()),
                    ));
                } else if choice == titles.len() {
                    orchestrator.back();
                } else {
                    orchestrator.reset();
                }
            }
            StageKind::Drafting => {
                // Only reachable if a request was dropped mid-flight.
                if let Stage::Drafting { phase, .. } = snapshot.stage() {
                    debug!(?phase, "Session left in drafting stage; starting over");
                }
                orchestrator.reset();
            }
            StageKind::Result => {
                let missing =
                    || ApiError::GenerationFailed("result stage without an article".to_string());
                let html = export_session(&snapshot).ok_or_else(missing)?;
                let artifact = snapshot.artifact().ok_or_else(missing)?;
                println!("{}", deliver(&html, output, artifact)?);

                let choice = Select::new()
                    .with_prompt("What next?")
                    .items(&["Draft another headline", "Start over", "Quit"])
                    .default(2)
                    .interact()
                    .map_err(input_error)?;
                match choice {
                    0 => {
                        orchestrator.back();
                    }
                    1 => {
                        orchestrator.reset();
                    }
                    _ => return Ok(String::new()),
                }
            }
        }
    }
}

/// Drive `task` to completion, echoing the session's status line whenever it changes.
fn run_with_status<F>(runtime: &Runtime, orchestrator: &Orchestrator, task: F) -> Outcome
where
    F: Future<Output = Outcome>,
{
    runtime.block_on(async {
        tokio::pin!(task);
        let mut ticker = tokio::time::interval(STATUS_POLL_INTERVAL);
        let mut last_status: Option<&'static str> = None;
        loop {
            tokio::select! {
                outcome = &mut task => return outcome,
                _ = ticker.tick() => {
                    let status = orchestrator.busy_message();
                    if status != last_status {
                        if let Some(message) = status {
                            eprintln!("{}", format_status_line(message));
                        }
                        last_status = status;
                    }
                }
            }
        }
    })
}

fn report(outcome: Outcome) {
    debug!(?outcome, "Interactive step finished");
}
