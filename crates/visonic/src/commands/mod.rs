//! Command dispatch: bridges CLI args -> hub calls -> output formatting.

pub mod arm;
pub mod config_cmd;
pub mod devices;
pub mod events;
pub mod panel;
pub mod sensors;
pub mod status;
pub mod util;
pub mod watch;

use visonic_core::AlarmHub;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a panel-bound command to the appropriate handler. The hub is
/// already connected.
pub async fn dispatch(cmd: Command, hub: &AlarmHub, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(hub, global),
        Command::Devices(args) => devices::handle(hub, &args, global),
        Command::Sensors => sensors::handle(hub, global),
        Command::Events(args) => events::handle(hub, &args, global).await,
        Command::Arm(args) => arm::handle_arm(hub, args, global).await,
        Command::Disarm(args) => arm::handle_disarm(hub, args, global).await,
        Command::Panel(args) => panel::handle(hub, &args, global).await,
        Command::SetTime => panel::set_time(hub, global).await,
        Command::Watch(args) => watch::handle(hub, &args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
