// ── Panel domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alarm_state::MappedState;

/// Partition status at one point in time. Replaced wholesale on every
/// successful refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSnapshot {
    pub ready: bool,
    pub raw_state: String,
    pub state: MappedState,
    pub active: bool,
    pub connected: bool,
    pub last_refresh: DateTime<Utc>,
}

/// Static panel identity, fetched once per connect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelInfo {
    pub name: Option<String>,
    pub serial: Option<String>,
    pub model: Option<String>,
}
