// ── Core error types ──
//
// Domain errors surfaced by the hub. Transport failures are split into
// "network unreachable" (keep the snapshot, retry next tick) and "HTTP
// error" (the session is no longer trusted). Local command rejections
// are their own variants and never involve the network.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Server does not support REST API 4.0 (supported: {})", supported.join(", "))]
    VersionUnsupported { supported: Vec<String> },

    #[error("Panel {panel_id} is not registered on this server")]
    PanelNotFound { panel_id: String },

    #[error("Not connected -- call connect() first")]
    NotConnected,

    // ── Command rejections (local, never sent) ───────────────────────
    #[error("Panel is not ready to arm")]
    NotReady,

    #[error("Wrong code")]
    WrongCode,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Unexpected response: {message}")]
    Protocol { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether the failure invalidates the current session.
    pub fn invalidates_session(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::AuthenticationFailed { .. })
    }

    /// Whether the failure was a local precondition, not a remote one.
    pub fn is_local_rejection(&self) -> bool {
        matches!(self, Self::NotReady | Self::WrongCode)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<visonic_api::Error> for CoreError {
    fn from(err: visonic_api::Error) -> Self {
        match err {
            visonic_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            visonic_api::Error::MissingToken => CoreError::NotConnected,
            visonic_api::Error::Network(e) => CoreError::Network {
                message: e.to_string(),
            },
            visonic_api::Error::Http { status, url } => CoreError::Http { status, url },
            visonic_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            visonic_api::Error::Tls(message) => CoreError::Config { message },
            visonic_api::Error::Deserialization { message, .. } => CoreError::Protocol { message },
        }
    }
}
