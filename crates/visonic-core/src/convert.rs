// ── API-to-domain type conversions ──
//
// Bridges raw `visonic_api::models` records into `visonic_core::model`
// types. Conversions are pure: every wire field the domain keeps is
// copied through unchanged.

use chrono::{DateTime, Utc};
use serde_json::Value;

use visonic_api::models::{DeviceRecord, EventRecord, GeneralPanelInfo, PartitionStatus};

use crate::model::event::{apply_hour_offset, parse_event_datetime};
use crate::model::{
    Device, DeviceClassifier, EventAction, LastEvent, PanelInfo, PanelSnapshot, StateMapper,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Alarm/alert counters arrive as a number, a list of codes, or nothing.
fn count_of(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0),
        Value::Array(items) => u32::try_from(items.len()).unwrap_or(u32::MAX),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

// ── Devices ────────────────────────────────────────────────────────

impl From<DeviceRecord> for Device {
    fn from(r: DeviceRecord) -> Self {
        Self {
            kind: DeviceClassifier::classify(&r.subtype),
            alarm_count: count_of(&r.alarms),
            alert_count: count_of(&r.alerts),
            id: r.id,
            zone: r.zone,
            location: r.location,
            device_type: r.device_type,
            type_name: r.type_name,
            subtype: r.subtype,
            pre_enroll: r.preenroll,
            soak: r.soak,
            bypass: r.bypass,
            troubles: r.troubles,
            bypass_availability: r.bypass_availability,
            partitions: r.partitions,
        }
    }
}

// ── Panel ──────────────────────────────────────────────────────────

impl From<GeneralPanelInfo> for PanelInfo {
    fn from(info: GeneralPanelInfo) -> Self {
        Self {
            name: info.name,
            serial: info.serial,
            model: info.model,
        }
    }
}

/// Build a snapshot from the first partition entry of a status payload.
pub fn snapshot_from_partition(
    partition: &PartitionStatus,
    connected: bool,
    mapper: &StateMapper,
    now: DateTime<Utc>,
) -> PanelSnapshot {
    PanelSnapshot {
        ready: partition.ready_status,
        raw_state: partition.state.clone(),
        state: mapper.map(&partition.state),
        active: partition.active,
        connected,
        last_refresh: now,
    }
}

// ── Events ─────────────────────────────────────────────────────────

/// Decode the most recent event (the last element of the log).
pub fn last_event(events: &[EventRecord], hour_offset: i32) -> Option<LastEvent> {
    let last = events.last()?;
    let timestamp =
        parse_event_datetime(&last.datetime).and_then(|ts| apply_hour_offset(ts, hour_offset));
    Some(LastEvent {
        event_id: last.event_id,
        action: last
            .type_id
            .map_or(EventAction::Untyped, EventAction::from_type_id),
        user: last.appointment.clone(),
        timestamp,
        raw_datetime: last.datetime.clone(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{AlarmState, ContactState, DeviceKind, MappedState};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> DeviceRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn contact_aux_with_opened_trouble_is_an_open_contact() {
        let device = Device::from(record(json!({
            "device_id": "5",
            "subtype": "CONTACT_AUX",
            "troubles": ["OPENED"]
        })));
        assert_eq!(device.kind, DeviceKind::Contact);
        assert_eq!(device.contact_state(), Some(ContactState::Opened));
    }

    #[test]
    fn device_fields_copy_through_unchanged() {
        let device = Device::from(record(json!({
            "device_id": "12",
            "zone": "PERIMETER",
            "location": "Back door",
            "device_type": "ZONE",
            "type": "CONTACT",
            "subtype": "CONTACT",
            "preenroll": true,
            "soak": false,
            "bypass": true,
            "alarms": 3,
            "alerts": ["TAMPER", "LOW_BATTERY"],
            "troubles": ["LOW_BATTERY", "OPENED"],
            "bypass_availability": true,
            "partitions": ["1", "2"]
        })));

        let expected = Device {
            id: "12".into(),
            kind: DeviceKind::Contact,
            zone: "PERIMETER".into(),
            location: "Back door".into(),
            device_type: "ZONE".into(),
            type_name: "CONTACT".into(),
            subtype: "CONTACT".into(),
            pre_enroll: true,
            soak: false,
            bypass: true,
            alarm_count: 3,
            alert_count: 2,
            troubles: vec!["LOW_BATTERY".into(), "OPENED".into()],
            bypass_availability: true,
            partitions: vec!["1".into(), "2".into()],
        };
        assert_eq!(device, expected);
    }

    #[test]
    fn snapshot_maps_raw_state() {
        let partition: PartitionStatus = serde_json::from_value(json!({
            "partition": "ALL",
            "ready_status": false,
            "state": "ExitDelayAway Instant",
            "active": true
        }))
        .unwrap();
        let now = Utc::now();
        let snap = snapshot_from_partition(&partition, true, &StateMapper::new(), now);

        assert_eq!(snap.state, MappedState::Known(AlarmState::Arming));
        assert_eq!(snap.raw_state, "ExitDelayAway Instant");
        assert!(!snap.ready);
        assert!(snap.active);
        assert!(snap.connected);
        assert_eq!(snap.last_refresh, now);
    }

    #[test]
    fn last_event_takes_final_entry_and_applies_offset() {
        let events: Vec<EventRecord> = serde_json::from_value(json!([
            { "event": 1, "type_id": 89, "appointment": "User 2", "datetime": "2024-03-01 08:00:00" },
            { "event": 2, "type_id": 86, "appointment": "User 1", "datetime": "2024-03-01 20:15:00" }
        ]))
        .unwrap();

        let event = last_event(&events, 2).unwrap();
        assert_eq!(event.event_id, Some(2));
        assert_eq!(event.action, EventAction::ArmAway);
        assert_eq!(event.user.as_deref(), Some("User 1"));
        assert_eq!(event.timestamp_display(), "2024-03-01 22:15:00");
    }

    #[test]
    fn last_event_of_empty_log_is_none() {
        assert!(last_event(&[], 0).is_none());
    }

    #[test]
    fn unparseable_event_time_falls_back_to_raw() {
        let events: Vec<EventRecord> =
            serde_json::from_value(json!([{ "event": 9, "type_id": 3, "datetime": "n/a" }]))
                .unwrap();
        let event = last_event(&events, 0).unwrap();
        assert_eq!(event.action, EventAction::Unknown(3));
        assert_eq!(event.timestamp, None);
        assert_eq!(event.timestamp_display(), "n/a");
    }

    #[test]
    fn event_without_type_id_is_untyped() {
        let events: Vec<EventRecord> = serde_json::from_value(json!([
            { "event": "x", "type_id": "arm", "datetime": "2024-03-01 08:00:00" }
        ]))
        .unwrap();
        let event = last_event(&events, 0).unwrap();
        assert_eq!(event.event_id, None);
        assert_eq!(event.action, EventAction::Untyped);
        assert_eq!(event.action.to_string(), "Unknown type_id");
    }
}
