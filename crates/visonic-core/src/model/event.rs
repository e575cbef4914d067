// ── Event log decoding ──

use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// Format of decoded event timestamps.
pub const EVENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TYPE_DISARM: i64 = 89;
const TYPE_ARM_HOME: i64 = 85;
const TYPE_ARM_AWAY: i64 = 86;

/// What an arm-related event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Disarm,
    ArmHome,
    ArmAway,
    Unknown(i64),
    /// The record carried no usable type id.
    Untyped,
}

impl EventAction {
    pub fn from_type_id(type_id: i64) -> Self {
        match type_id {
            TYPE_DISARM => Self::Disarm,
            TYPE_ARM_HOME => Self::ArmHome,
            TYPE_ARM_AWAY => Self::ArmAway,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disarm => f.write_str("Disarm"),
            Self::ArmHome => f.write_str("ArmHome"),
            Self::ArmAway => f.write_str("ArmAway"),
            Self::Unknown(type_id) => write!(f, "Unknown type_id: {type_id}"),
            Self::Untyped => f.write_str("Unknown type_id"),
        }
    }
}

/// The most recent entry of the panel event log, decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastEvent {
    pub event_id: Option<i64>,
    pub action: EventAction,
    pub user: Option<String>,
    /// Event time shifted by the configured hour offset; `None` when the
    /// server's timestamp could not be parsed.
    pub timestamp: Option<NaiveDateTime>,
    pub raw_datetime: String,
}

impl LastEvent {
    /// Timestamp as `YYYY-MM-DD HH:MM:SS`, or the raw server value.
    pub fn timestamp_display(&self) -> String {
        self.timestamp.map_or_else(
            || self.raw_datetime.clone(),
            |ts| ts.format(EVENT_TIMESTAMP_FORMAT).to_string(),
        )
    }
}

/// Parse a server timestamp. Offsets in RFC 3339 input are dropped: the
/// server reports panel-local wall time.
pub fn parse_event_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Shift `ts` by a whole number of hours.
pub fn apply_hour_offset(ts: NaiveDateTime, hours: i32) -> Option<NaiveDateTime> {
    ts.checked_add_signed(TimeDelta::try_hours(i64::from(hours))?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn type_ids_decode_to_actions() {
        assert_eq!(EventAction::from_type_id(89), EventAction::Disarm);
        assert_eq!(EventAction::from_type_id(85), EventAction::ArmHome);
        assert_eq!(EventAction::from_type_id(86), EventAction::ArmAway);
        assert_eq!(EventAction::from_type_id(4), EventAction::Unknown(4));
        assert_eq!(EventAction::Unknown(4).to_string(), "Unknown type_id: 4");
    }

    #[test]
    fn timestamps_parse_in_common_layouts() {
        assert_eq!(parse_event_datetime("2024-03-01 20:15:00"), Some(at(20, 15, 0)));
        assert_eq!(parse_event_datetime("2024-03-01T20:15:00"), Some(at(20, 15, 0)));
        assert_eq!(
            parse_event_datetime("2024-03-01T20:15:00+02:00"),
            Some(at(20, 15, 0))
        );
        assert_eq!(parse_event_datetime("yesterday"), None);
    }

    #[test]
    fn hour_offset_crosses_midnight() {
        let shifted = apply_hour_offset(at(23, 30, 0), 2).unwrap();
        assert_eq!(shifted.format(EVENT_TIMESTAMP_FORMAT).to_string(), "2024-03-02 01:30:00");

        let back = apply_hour_offset(at(0, 30, 0), -1).unwrap();
        assert_eq!(back.format(EVENT_TIMESTAMP_FORMAT).to_string(), "2024-02-29 23:30:00");
    }
}
