//! Arm and disarm handlers.

use visonic_core::{AlarmHub, ArmMode};

use crate::cli::{ArmArgs, ArmTarget, DisarmArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle_arm(hub: &AlarmHub, args: ArmArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let code = util::command_code(hub, args.code)?;
    let mode = match args.mode {
        ArmTarget::Home => ArmMode::Home,
        ArmTarget::Away => ArmMode::Away,
    };
    let instant = args.instant || hub.config().poll.arm_instant;

    hub.arm(mode, instant, code.as_deref()).await?;
    report_state(hub, global, if instant { "Arm (instant) sent" } else { "Arm sent" });
    Ok(())
}

pub async fn handle_disarm(
    hub: &AlarmHub,
    args: DisarmArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let code = util::command_code(hub, args.code)?;
    hub.disarm(code.as_deref()).await?;
    report_state(hub, global, "Disarm sent");
    Ok(())
}

/// The refresh after a command may still show the transition state.
fn report_state(hub: &AlarmHub, global: &GlobalOpts, what: &str) {
    if global.quiet {
        return;
    }
    let color = output::should_color(&global.color);
    match hub.state() {
        Some(state) => eprintln!("{what}, panel is {}", output::paint_state(&state, color)),
        None => eprintln!("{what}"),
    }
}
