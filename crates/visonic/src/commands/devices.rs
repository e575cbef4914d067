//! Device list handler.

use tabled::Tabled;
use visonic_core::{AlarmHub, Device};

use crate::cli::{DevicesArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Subtype")]
    subtype: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Contact")]
    contact: String,
    #[tabled(rename = "Troubles")]
    troubles: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.clone(),
            zone: d.zone.clone(),
            location: d.location.clone(),
            subtype: d.subtype.clone(),
            kind: d.kind.to_string(),
            contact: d.contact_state().map(|c| c.to_string()).unwrap_or_default(),
            troubles: d.troubles.join(", "),
        }
    }
}

#[derive(Tabled)]
struct DeviceDetailRow {
    #[tabled(inline)]
    base: DeviceRow,
    #[tabled(rename = "Type")]
    type_name: String,
    #[tabled(rename = "Bypass")]
    bypass: String,
    #[tabled(rename = "Soak")]
    soak: String,
    #[tabled(rename = "Alarms")]
    alarms: u32,
    #[tabled(rename = "Alerts")]
    alerts: u32,
    #[tabled(rename = "Partitions")]
    partitions: String,
}

impl From<&Device> for DeviceDetailRow {
    fn from(d: &Device) -> Self {
        let flag = |b: bool| if b { "yes" } else { "" }.to_owned();
        Self {
            base: DeviceRow::from(d),
            type_name: d.type_name.clone(),
            bypass: flag(d.bypass),
            soak: flag(d.soak),
            alarms: d.alarm_count,
            alerts: d.alert_count,
            partitions: d.partitions.join(","),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(hub: &AlarmHub, args: &DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let devices = hub.devices();
    let out = if args.detailed {
        output::render_list(
            &global.output,
            devices.as_slice(),
            |d| DeviceDetailRow::from(d),
            |d| d.id.clone(),
        )
    } else {
        output::render_list(
            &global.output,
            devices.as_slice(),
            |d| DeviceRow::from(d),
            |d| d.id.clone(),
        )
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
