//! Polling loop: refreshes on a fixed cadence and prints state changes.

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, warn};
use visonic_core::{AlarmHub, AlarmState, LastEvent, MappedState, UpdateOutcome};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

/// One printed line of the watch stream.
#[derive(Debug, Serialize)]
struct Transition {
    at: DateTime<Local>,
    state: MappedState,
    raw_state: String,
    ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    changed_by: Option<LastEvent>,
}

pub async fn handle(hub: &AlarmHub, args: &WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let every = args.interval.unwrap_or(hub.config().refresh_interval);
    let hour_offset = hub.config().poll.event_hour_offset;
    let color = output::should_color(&global.color);

    let mut last: Option<(MappedState, bool)> = None;
    if let Some(snap) = hub.snapshot() {
        emit(
            &Transition {
                at: Local::now(),
                state: snap.state.clone(),
                raw_state: snap.raw_state.clone(),
                ready: snap.ready,
                changed_by: None,
            },
            global,
            color,
        );
        last = Some((snap.state.clone(), snap.ready));
    }

    loop {
        // Sleeping after each refresh keeps the cadence at or above the
        // hub's refresh interval, so unforced updates are not throttled.
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            () = tokio::time::sleep(every) => {}
        }

        match hub.update(false).await {
            Ok(UpdateOutcome::Refreshed) => {}
            Ok(outcome) => {
                debug!(?outcome, "no refresh this tick");
                continue;
            }
            Err(e) => {
                warn!(error = %e, "refresh failed");
                continue;
            }
        }

        let Some(snap) = hub.snapshot() else {
            continue;
        };
        let current = (snap.state.clone(), snap.ready);
        if last.as_ref() == Some(&current) {
            continue;
        }

        let state_changed = last.as_ref().is_none_or(|(state, _)| *state != current.0);
        let changed_by = if state_changed && current.0.known().is_some_and(AlarmState::is_settled) {
            match hub.get_last_event(hour_offset).await {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "could not read the event log");
                    None
                }
            }
        } else {
            None
        };

        emit(
            &Transition {
                at: Local::now(),
                state: current.0.clone(),
                raw_state: snap.raw_state.clone(),
                ready: current.1,
                changed_by,
            },
            global,
            color,
        );
        last = Some(current);
    }

    hub.disconnect();
    Ok(())
}

fn emit(t: &Transition, global: &GlobalOpts, color: bool) {
    let line = match global.output {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            serde_json::to_string(t).unwrap_or_default()
        }
        OutputFormat::Yaml => serde_yaml::to_string(t).unwrap_or_default(),
        OutputFormat::Plain => t.state.to_string(),
        OutputFormat::Table => {
            let mut line = format!(
                "{}  {}  ready={}",
                t.at.format("%Y-%m-%d %H:%M:%S"),
                output::paint_state(&t.state, color),
                output::paint_flag(t.ready, color),
            );
            if let Some(ref event) = t.changed_by {
                line.push_str(&format!(
                    "  by {} ({}, {})",
                    event.user.as_deref().unwrap_or("unknown"),
                    event.action,
                    event.timestamp_display()
                ));
            }
            line
        }
    };
    output::print_output(&line, global.quiet);
}
