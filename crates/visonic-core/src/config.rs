// ── Runtime configuration ──
//
// Everything the hub needs, already resolved. The core never reads files
// or the keyring; `visonic-config` builds a `HubConfig` from profiles.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;
use visonic_api::{Credentials, TlsMode, TransportConfig};

use crate::error::CoreError;
use crate::model::AlarmState;

/// Minimum time between two unforced refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Wait between a command and the forced refresh that follows it.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Behaviour switches for commands and event decoding.
#[derive(Debug, Clone, Default)]
pub struct PollOptions {
    /// Skip the local PIN check on commands.
    pub no_pin_required: bool,
    /// Route `arm_home`/`arm_away` to their instant endpoints.
    pub arm_instant: bool,
    /// Hours added to event timestamps (the server reports a fixed zone).
    pub event_hour_offset: i32,
}

/// Configuration for one panel session.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Server root, e.g. `https://visonic.tycomonitor.com`.
    pub root_url: Url,
    pub user_code: SecretString,
    pub user_id: String,
    pub panel_id: String,
    pub partition: String,
    pub poll: PollOptions,
    pub refresh_interval: Duration,
    pub settle_delay: Duration,
    pub tls: TlsMode,
    pub timeout: Duration,
    /// Raw state strings mapped on top of the built-in table.
    pub state_aliases: Vec<(String, AlarmState)>,
}

impl HubConfig {
    /// A config with defaults for everything but the identity fields.
    ///
    /// `host` is either a bare hostname (`https://` is assumed) or a full URL.
    pub fn new(
        host: &str,
        user_code: SecretString,
        user_id: impl Into<String>,
        panel_id: impl Into<String>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            root_url: root_url_for_host(host)?,
            user_code,
            user_id: user_id.into(),
            panel_id: panel_id.into(),
            partition: "ALL".into(),
            poll: PollOptions::default(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            state_aliases: Vec::new(),
        })
    }

    pub(crate) fn credentials(&self) -> Credentials {
        Credentials::new(self.user_code.clone(), &self.user_id, &self.panel_id)
            .with_partition(&self.partition)
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            ..TransportConfig::default()
        }
        .with_timeout(self.timeout)
    }
}

/// Turn a configured host into the server root URL.
pub fn root_url_for_host(host: &str) -> Result<Url, CoreError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(CoreError::Config {
            message: "host must not be empty".into(),
        });
    }
    let candidate = if host.contains("://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    };
    Url::parse(&candidate).map_err(|e| CoreError::Config {
        message: format!("invalid host {host:?}: {e}"),
    })
}
