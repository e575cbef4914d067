//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use visonic_config::ConfigError;
use visonic_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Visonic server")]
    #[diagnostic(
        code(visonic::connection_failed),
        help(
            "Check the network and the server hostname.\n\
             Reason: {message}"
        )
    )]
    ConnectionFailed { message: String },

    #[error("Server answered HTTP {status} for {url}")]
    #[diagnostic(
        code(visonic::http),
        help("The session was dropped by the server. Retry the command.")
    )]
    Http { status: u16, url: String },

    #[error("Server does not speak REST API 4.0")]
    #[diagnostic(
        code(visonic::unsupported_server),
        help("The server advertises: {supported}")
    )]
    UnsupportedServer { supported: String },

    #[error("Panel '{panel_id}' is not registered on this server")]
    #[diagnostic(
        code(visonic::panel_not_found),
        help("Check panel_id in your profile or pass --panel-id.")
    )]
    PanelNotFound { panel_id: String },

    #[error("No session with the panel")]
    #[diagnostic(
        code(visonic::not_connected),
        help("The panel did not report a status yet. Run: visonic status")
    )]
    NotConnected,

    #[error("Unexpected response from the server: {message}")]
    #[diagnostic(code(visonic::protocol))]
    Protocol { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login failed for profile '{profile}'")]
    #[diagnostic(
        code(visonic::auth_failed),
        help(
            "Verify the user code and the user_id registered with the panel.\n\
             Run: visonic config set-code --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No user code configured for profile '{profile}'")]
    #[diagnostic(
        code(visonic::no_credentials),
        help(
            "Store one with: visonic config set-code\n\
             Or set the VISONIC_USER_CODE environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Command rejections ───────────────────────────────────────────
    #[error("The alarm system is not ready to arm")]
    #[diagnostic(
        code(visonic::not_ready),
        help("Maybe there are doors or windows open? Run: visonic sensors")
    )]
    NotReady,

    #[error("Wrong user code")]
    #[diagnostic(code(visonic::wrong_code))]
    WrongCode,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(visonic::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(visonic::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: visonic config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No panel configured")]
    #[diagnostic(
        code(visonic::no_config),
        help(
            "Create a profile with: visonic config init\n\
             Or pass --user-id and --panel-id.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(visonic::config))]
    Config(Box<figment::Error>),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Http { .. } | Self::NotConnected => {
                exit_code::CONNECTION
            }
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::PanelNotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::NotReady | Self::WrongCode => exit_code::REJECTED,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Network { message } => CliError::ConnectionFailed { message },
            CoreError::Http { status, url } => CliError::Http { status, url },
            CoreError::AuthenticationFailed { message: _ } => CliError::AuthFailed {
                profile: "current".into(),
            },
            CoreError::VersionUnsupported { supported } => CliError::UnsupportedServer {
                supported: if supported.is_empty() {
                    "(nothing)".into()
                } else {
                    supported.join(", ")
                },
            },
            CoreError::PanelNotFound { panel_id } => CliError::PanelNotFound { panel_id },
            CoreError::NotConnected => CliError::NotConnected,
            CoreError::NotReady => CliError::NotReady,
            CoreError::WrongCode => CliError::WrongCode,
            CoreError::Protocol { message } => CliError::Protocol { message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { profile } => CliError::ProfileNotFound {
                name: profile,
                available: String::new(),
            },
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
