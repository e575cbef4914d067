// visonic-api: Async Rust client for the Visonic alarm panel cloud REST API

pub mod auth;
pub mod client;
pub mod commands;
pub mod error;
pub mod models;
pub mod status;
pub mod transport;

pub use auth::{Credentials, SessionToken};
pub use client::{APP_TYPE, REST_VERSION, SESSION_TOKEN_HEADER, VisonicClient};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
