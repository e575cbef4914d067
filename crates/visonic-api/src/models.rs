// Visonic REST API wire types
//
// Models for the request and response bodies of the `/rest_api/4.0` surface.
// Fields use `#[serde(default)]` liberally and lenient scalar decoding
// because the server is inconsistent about field presence and about
// string-vs-number encodings across panel firmware versions.

use serde::{Deserialize, Serialize};

// ── Lenient decoding helpers ─────────────────────────────────────────

pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// A string, number, or bool rendered as a string; `null` becomes empty.
    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(scalar_to_string(Value::deserialize(d)?).unwrap_or_default())
    }

    /// Like [`string`], but keeps `null` as `None`.
    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(scalar_to_string(Value::deserialize(d)?))
    }

    /// A list of scalars, a single scalar, or `null` (empty list).
    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items.into_iter().filter_map(scalar_to_string).collect(),
            Value::Null => Vec::new(),
            other => scalar_to_string(other).into_iter().collect(),
        })
    }

    /// A bool that may also arrive as `null`, `0`/`1`, or `"true"`/`"false"`.
    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
            Value::String(s) => s.eq_ignore_ascii_case("true") || s == "1",
            _ => false,
        })
    }

    /// An integer that may arrive as a number or a numeric string. Anything
    /// else is `None`, never a made-up zero.
    pub fn opt_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }
}

// ── Session / capability ─────────────────────────────────────────────

/// `GET /rest_api/version`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(default)]
    pub rest_versions: Vec<String>,
}

impl VersionInfo {
    pub fn supports(&self, version: &str) -> bool {
        self.rest_versions.iter().any(|v| v == version)
    }
}

/// `GET /is_panel_exists` -- a bare JSON boolean on most servers, an
/// object on some.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PanelExists {
    Flag(bool),
    Wrapped {
        #[serde(alias = "exists")]
        is_panel_exists: bool,
    },
}

impl PanelExists {
    pub fn exists(&self) -> bool {
        match self {
            Self::Flag(b) => *b,
            Self::Wrapped { is_panel_exists } => *is_panel_exists,
        }
    }
}

/// `POST /login` request body.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub user_code: &'a str,
    pub app_type: &'a str,
    pub user_id: &'a str,
    pub panel_web_name: &'a str,
}

/// `POST /login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub session_token: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `GET /is_master_user`
#[derive(Debug, Clone, Deserialize)]
pub struct MasterUser {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_master_user: bool,
}

// ── Status ───────────────────────────────────────────────────────────

/// `GET /status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_connected: bool,
    #[serde(default)]
    pub partitions: Vec<PartitionStatus>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One entry of the status payload's partition list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionStatus {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub partition: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub ready_status: bool,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `GET /general_panel_info`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralPanelInfo {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub serial: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub model: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// One element of `GET /all_devices`.
///
/// `alarms` and `alerts` are kept as raw JSON: firmware reports them
/// either as counts or as lists of condition codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(rename = "device_id", deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub zone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub device_type: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub type_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub subtype: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub preenroll: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub soak: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub bypass: bool,
    #[serde(default)]
    pub alarms: serde_json::Value,
    #[serde(default)]
    pub alerts: serde_json::Value,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub troubles: Vec<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub bypass_availability: bool,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub partitions: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Events ───────────────────────────────────────────────────────────

/// One element of `GET /events`. The log is ordered oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "event", default, deserialize_with = "lenient::opt_int")]
    pub event_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub type_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    /// The user (or keyfob, or code slot) that caused the event.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub appointment: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub datetime: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub video: bool,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub device_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub zone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub partitions: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Commands ─────────────────────────────────────────────────────────

/// Body of every arm/disarm command.
#[derive(Debug, Serialize)]
pub struct PartitionCommand<'a> {
    pub partition: &'a str,
}

/// `POST /set_date_time` body. `time` is local time as `YYYYMMDDTHHMMSS`.
#[derive(Debug, Serialize)]
pub struct SetDateTime {
    pub time: String,
}
