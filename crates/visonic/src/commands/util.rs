//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use visonic_core::{AlarmHub, Notifier};

use crate::error::CliError;

/// Connect to the panel, showing a spinner on interactive terminals.
pub async fn connect(hub: &AlarmHub, quiet: bool) -> Result<(), CliError> {
    let spinner = (!quiet && std::io::stderr().is_terminal()).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Connecting to panel {}", hub.config().panel_id));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let result = hub.connect().await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    Ok(result?)
}

/// The code to send with a command, prompting when the profile requires
/// one and none was given.
pub fn command_code(hub: &AlarmHub, code: Option<String>) -> Result<Option<String>, CliError> {
    if code.is_some() || hub.config().poll.no_pin_required {
        return Ok(code);
    }
    let entered = rpassword::prompt_password("User code: ").map_err(prompt_err)?;
    Ok(Some(entered))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prints hub notifications to stderr.
pub struct StderrNotifier {
    pub color: bool,
}

impl Notifier for StderrNotifier {
    fn notify(&self, title: &str, message: &str) {
        if self.color {
            eprintln!("{} {message}", format!("{title}:").red().bold());
        } else {
            eprintln!("{title}: {message}");
        }
    }
}
