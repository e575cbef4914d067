// ── Device domain types ──

use serde::{Deserialize, Serialize};
use strum::Display;

/// Device variant, chosen from the subtype at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceKind {
    Contact,
    Camera,
    Smoke,
    Generic,
}

/// Open/closed state of a contact device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactState {
    Opened,
    Closed,
}

/// Trouble code a contact reports while open.
pub const OPENED_TROUBLE: &str = "OPENED";

/// A zone device as reported by the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub kind: DeviceKind,
    pub zone: String,
    pub location: String,
    pub device_type: String,
    pub type_name: String,
    pub subtype: String,
    pub pre_enroll: bool,
    pub soak: bool,
    pub bypass: bool,
    pub alarm_count: u32,
    pub alert_count: u32,
    pub troubles: Vec<String>,
    pub bypass_availability: bool,
    pub partitions: Vec<String>,
}

impl Device {
    pub fn has_trouble(&self, code: &str) -> bool {
        self.troubles.iter().any(|t| t.contains(code))
    }

    /// Open/closed state, for contact devices only.
    pub fn contact_state(&self) -> Option<ContactState> {
        (self.kind == DeviceKind::Contact).then(|| {
            if self.has_trouble(OPENED_TROUBLE) {
                ContactState::Opened
            } else {
                ContactState::Closed
            }
        })
    }
}

// ── Classification ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum SubtypePattern {
    Exact(&'static str),
    Contains(&'static str),
}

impl SubtypePattern {
    fn matches(self, subtype: &str) -> bool {
        match self {
            Self::Exact(p) => subtype == p,
            Self::Contains(p) => subtype.contains(p),
        }
    }
}

/// First matching rule wins; no match means `Generic`.
const CLASSIFICATION_RULES: &[(SubtypePattern, DeviceKind)] = &[
    (SubtypePattern::Exact("CONTACT_AUX"), DeviceKind::Contact),
    (SubtypePattern::Contains("CONTACT"), DeviceKind::Contact),
    (SubtypePattern::Exact("MOTION_CAMERA"), DeviceKind::Camera),
    (SubtypePattern::Exact("SMOKE"), DeviceKind::Smoke),
];

/// Picks a [`DeviceKind`] from a device subtype.
pub struct DeviceClassifier;

impl DeviceClassifier {
    pub fn classify(subtype: &str) -> DeviceKind {
        CLASSIFICATION_RULES
            .iter()
            .find(|(pattern, _)| pattern.matches(subtype))
            .map_or(DeviceKind::Generic, |(_, kind)| *kind)
    }
}
