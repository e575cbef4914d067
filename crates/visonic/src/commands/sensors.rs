//! Sensor list handler.

use tabled::Tabled;
use visonic_core::{AlarmHub, SensorReading};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "State")]
    state: String,
}

pub fn handle(hub: &AlarmHub, global: &GlobalOpts) -> Result<(), CliError> {
    let readings = hub.sensor_devices();
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &readings,
        |r: &SensorReading| SensorRow {
            id: r.device.id.clone(),
            location: r.device.location.clone(),
            zone: r.device.zone.clone(),
            class: r.class.to_string(),
            state: output::paint_sensor(r.state, color),
        },
        |r| format!("{}\t{}", r.device.id, r.state),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
