//! Event log handler.

use tabled::Tabled;
use visonic_core::{AlarmHub, EventRecord, LastEvent};

use crate::cli::{EventsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Type")]
    type_id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Zone")]
    zone: String,
}

impl From<&EventRecord> for EventRow {
    fn from(e: &EventRecord) -> Self {
        Self {
            id: display_id(e.event_id),
            time: e.datetime.clone(),
            type_id: display_id(e.type_id),
            label: e.label.clone().unwrap_or_default(),
            description: e.description.clone().unwrap_or_default(),
            user: e.appointment.clone().unwrap_or_default(),
            zone: e.zone.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(hub: &AlarmHub, args: &EventsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if args.last {
        let offset = args
            .hour_offset
            .unwrap_or(hub.config().poll.event_hour_offset);
        let Some(event) = hub.get_last_event(offset).await? else {
            if !global.quiet {
                eprintln!("Event log is empty");
            }
            return Ok(());
        };
        let out = output::render_single(&global.output, &event, last_event_detail, |e| {
            e.action.to_string()
        });
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    let events = hub.events().await?;
    let out = output::render_list(
        &global.output,
        &events,
        |e| EventRow::from(e),
        |e| display_id(e.event_id),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn last_event_detail(e: &LastEvent) -> String {
    output::detail_block(&[
        ("Event", display_id(e.event_id)),
        ("Action", e.action.to_string()),
        ("User", e.user.clone().unwrap_or_else(|| "-".into())),
        ("Time", e.timestamp_display()),
    ])
}

fn display_id(id: Option<i64>) -> String {
    id.map_or_else(|| "-".into(), |id| id.to_string())
}
