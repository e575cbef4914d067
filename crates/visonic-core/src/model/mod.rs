// ── Domain model ──
//
// Canonical types the hub exposes to consumers. Wire types from
// `visonic-api` are converted in `crate::convert`.

pub mod alarm_state;
pub mod device;
pub mod event;
pub mod panel;
pub mod sensor;

pub use alarm_state::{AlarmState, MappedState, StateMapper};
pub use device::{ContactState, Device, DeviceClassifier, DeviceKind};
pub use event::{EventAction, LastEvent};
pub use panel::{PanelInfo, PanelSnapshot};
pub use sensor::{SensorClass, SensorReading, SensorState};
