use thiserror::Error;

/// Top-level error type for the `visonic-api` crate.
///
/// Separates transport-level failures (DNS, TCP, TLS) from non-success
/// HTTP responses so callers can decide between "retry next tick" and
/// "session is no longer trusted". `visonic-core` maps these into
/// domain-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login was rejected by the server.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// An authenticated call was attempted before a successful login.
    #[error("No session token -- login required")]
    MissingToken,

    // ── Transport ───────────────────────────────────────────────────
    /// Transport failure (connection refused, DNS failure, TLS, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration error (bad CA file, client build failure).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
