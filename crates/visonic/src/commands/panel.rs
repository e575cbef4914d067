//! Raw panel endpoint handlers and panel clock.

use chrono::Local;
use serde_json::Value;
use visonic_core::AlarmHub;

use crate::cli::{GlobalOpts, PanelArgs, PanelCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(hub: &AlarmHub, args: &PanelArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let value = match args.command {
        PanelCommand::Alarms => hub.alarms().await?,
        PanelCommand::Alerts => hub.alerts().await?,
        PanelCommand::Troubles => hub.troubles().await?,
        PanelCommand::Locations => hub.locations().await?,
        PanelCommand::Users => hub.active_users_info().await?,
        PanelCommand::WakeupSms => hub.wakeup_sms().await?,
    };

    // Field sets vary by firmware, so tables show the JSON as-is.
    let out = output::render_single(
        &global.output,
        &value,
        |v| serde_json::to_string_pretty(v).unwrap_or_default(),
        plain_lines,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

/// One compact JSON value per line; arrays are split into their elements.
fn plain_lines(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub async fn set_time(hub: &AlarmHub, global: &GlobalOpts) -> Result<(), CliError> {
    let now = Local::now().naive_local();
    if hub.is_master_user() == Some(false)
        && !util::confirm(
            "This user is not a master user and the panel will likely refuse. Try anyway?",
            global.yes,
        )?
    {
        return Ok(());
    }

    hub.set_date_time(now).await?;
    if !global.quiet {
        eprintln!("Panel clock set to {}", now.format("%Y-%m-%d %H:%M:%S"));
    }
    Ok(())
}
