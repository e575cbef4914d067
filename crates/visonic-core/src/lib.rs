//! Domain layer between `visonic-api` and hosts (CLI, home automation).
//!
//! - **[`AlarmHub`]** owns one panel session: [`connect()`](AlarmHub::connect)
//!   validates server and panel and logs in, [`update()`](AlarmHub::update)
//!   refreshes status and devices behind a minimum-interval throttle, and the
//!   command methods arm or disarm with PIN and ready checks.
//!
//! - **[`StateMapper`]** turns raw panel state strings into [`AlarmState`],
//!   reporting anything it does not recognize as [`MappedState::Unparsed`].
//!
//! - **[`DeviceClassifier`]** picks a [`DeviceKind`] from the subtype;
//!   [`model::sensor`] derives open/closed and motion on/off states.
//!
//! - **[`SnapshotStore`]** keeps the last snapshot and device list, swapped
//!   atomically on each refresh.
//!
//! - **[`Notifier`]** receives user-visible failures.

pub mod config;
pub mod convert;
pub mod error;
pub mod hub;
pub mod model;
pub mod notify;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{HubConfig, PollOptions};
pub use error::CoreError;
pub use hub::{AlarmHub, ArmMode, ConnectionState, UpdateOutcome};
pub use notify::{Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use store::SnapshotStore;

pub use model::{
    AlarmState, ContactState, Device, DeviceClassifier, DeviceKind, EventAction, LastEvent,
    MappedState, PanelInfo, PanelSnapshot, SensorClass, SensorReading, SensorState, StateMapper,
};

// Hosts that only depend on the core still need a few transport types.
pub use visonic_api::models::EventRecord;
pub use visonic_api::{TlsMode, TransportConfig};
