// ── Sensor state derivation ──
//
// Contact and motion-class devices exposed as binary sensors. Motion and
// curtain detectors have no state of their own in the API; whether they
// count as "on" follows from the arm state and the zone type. Interior
// zones stay quiet while armed home, 24-hour zones are always on.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::alarm_state::{AlarmState, MappedState};
use super::device::{Device, OPENED_TROUBLE};

/// Derived state of a sensor device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SensorState {
    Open,
    Closed,
    On,
    Off,
    Unknown,
}

/// Sensor class, from the subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SensorClass {
    Contact,
    Motion,
    Other,
}

impl SensorClass {
    pub fn of(subtype: &str) -> Self {
        if subtype.contains("CONTACT") {
            Self::Contact
        } else if subtype.contains("MOTION") || subtype.contains("CURTAIN") {
            Self::Motion
        } else {
            Self::Other
        }
    }
}

/// Whether a device is exposed as a sensor at all.
pub fn is_sensor_candidate(device: &Device) -> bool {
    SensorClass::of(&device.subtype) != SensorClass::Other
}

/// Sensor state of `device` given the current panel state.
pub fn derive_sensor_state(device: &Device, panel: &MappedState) -> SensorState {
    match SensorClass::of(&device.subtype) {
        SensorClass::Contact => {
            if device.has_trouble(OPENED_TROUBLE) {
                SensorState::Open
            } else {
                SensorState::Closed
            }
        }
        SensorClass::Motion => motion_state(&device.zone, panel),
        SensorClass::Other => SensorState::Unknown,
    }
}

fn motion_state(zone: &str, panel: &MappedState) -> SensorState {
    let on_if = |cond: bool| if cond { SensorState::On } else { SensorState::Off };
    match panel.known() {
        Some(AlarmState::Disarmed | AlarmState::Arming) => on_if(zone.contains("24H")),
        Some(AlarmState::ArmedHome) => on_if(!zone.contains("INTERIOR")),
        Some(AlarmState::ArmedAway | AlarmState::Disarming) => SensorState::On,
        Some(AlarmState::Pending | AlarmState::Triggered) | None => SensorState::Unknown,
    }
}

/// A sensor device paired with its derived state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    pub device: Device,
    pub class: SensorClass,
    pub state: SensorState,
}
