//! Readiness check command.

use anyhow::Result;
use console::style;
use medibot_core::rag::answer::AnswerService;

use crate::state::AppState;

/// Print the boot-time readiness of the answering pipeline as JSON.
///
/// Returns whether the pipeline is ready so the caller can set the exit code.
pub fn check(state: &AppState) -> Result<bool> {
    println!("{}", serde_json::to_string_pretty(&state.readiness.to_json())?);

    let ready = state.readiness.is_ready();
    if ready {
        eprintln!(
            "  {} answering with {} over index {}",
            style("✓").green().bold(),
            style(state.chat_service.answers().name()).cyan(),
            style(&state.config.rag.index_name).cyan()
        );
    } else {
        eprintln!("  {} answering pipeline not ready", style("✗").red().bold());
    }
    Ok(ready)
}
