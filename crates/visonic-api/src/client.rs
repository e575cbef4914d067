// Visonic REST API HTTP client
//
// Wraps `reqwest::Client` with Visonic-specific URL construction, session
// token handling, and status-code checking. Endpoint groups (auth, status,
// commands) are implemented as inherent methods in separate files to keep
// this module focused on transport mechanics.

use std::sync::RwLock;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{Credentials, SessionToken};
use crate::error::Error;
use crate::transport::TransportConfig;

/// REST API version this client speaks.
pub const REST_VERSION: &str = "4.0";

/// Application identifier sent with the login request.
pub const APP_TYPE: &str = "com.visonic.PowerMaxApp";

/// Header carrying the session token on authenticated calls.
pub const SESSION_TOKEN_HEADER: &str = "Session-Token";

/// Raw HTTP client for one panel's session on the Visonic REST API.
///
/// Owns the session token exclusively: it is written by
/// [`login`](Self::login), attached to authenticated calls, and dropped
/// by [`clear_session`](Self::clear_session).
pub struct VisonicClient {
    http: reqwest::Client,
    root_url: Url,
    credentials: Credentials,
    session: RwLock<Option<SessionToken>>,
}

impl VisonicClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `root_url` is the server root (e.g. `https://visonic.tycomonitor.com`);
    /// the `/rest_api/...` prefix is added per request.
    pub fn new(
        root_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, root_url, credentials))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, root_url: Url, credentials: Credentials) -> Self {
        Self {
            http,
            root_url,
            credentials,
            session: RwLock::new(None),
        }
    }

    /// The server root URL.
    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The partition selector sent with every command.
    pub fn partition(&self) -> &str {
        &self.credentials.partition
    }

    // ── Session token management ──────────────────────────────────────

    /// The current session token, if logged in.
    pub fn session_token(&self) -> Option<SessionToken> {
        self.session.read().expect("session lock poisoned").clone()
    }

    pub fn has_session(&self) -> bool {
        self.session.read().expect("session lock poisoned").is_some()
    }

    pub(crate) fn set_session_token(&self, token: String) {
        debug!("storing session token");
        *self.session.write().expect("session lock poisoned") = Some(SessionToken {
            token: SecretString::from(token),
            issued_at: Utc::now(),
        });
    }

    /// Forget the current session token.
    pub fn clear_session(&self) {
        *self.session.write().expect("session lock poisoned") = None;
    }

    fn apply_token(
        &self,
        builder: reqwest::RequestBuilder,
        with_token: bool,
    ) -> Result<reqwest::RequestBuilder, Error> {
        if !with_token {
            return Ok(builder);
        }
        let guard = self.session.read().expect("session lock poisoned");
        let session = guard.as_ref().ok_or(Error::MissingToken)?;
        Ok(builder.header(SESSION_TOKEN_HEADER, session.token.expose_secret()))
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{root}/rest_api/version` -- the only unversioned endpoint.
    pub(crate) fn version_url(&self) -> Result<Url, Error> {
        let base = self.root_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/rest_api/version"))?)
    }

    /// `{root}/rest_api/4.0/{path}`
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.root_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/rest_api/{REST_VERSION}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request, attaching the session token if requested.
    pub(crate) async fn send_get<T: DeserializeOwned>(
        &self,
        url: Url,
        with_token: bool,
    ) -> Result<T, Error> {
        debug!("GET {}", url);

        let builder = self.apply_token(self.http.get(url), with_token)?;
        let resp = builder.send().await?;

        Self::parse_response(resp).await
    }

    /// Send a POST request with a JSON body, attaching the session token
    /// if requested.
    pub(crate) async fn send_post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
        with_token: bool,
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let builder = self.apply_token(self.http.post(url).json(body), with_token)?;
        let resp = builder.send().await?;

        Self::parse_response(resp).await
    }

    /// Send a POST whose answer carries nothing the caller needs. Any 2xx
    /// counts as success and the body is discarded unread.
    pub(crate) async fn send_post_unit(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
        with_token: bool,
    ) -> Result<(), Error> {
        debug!("POST {}", url);

        let builder = self.apply_token(self.http.post(url).json(body), with_token)?;
        let resp = builder.send().await?;

        Self::check_status(resp).map(drop)
    }

    fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(Error::Http {
                status: status.as_u16(),
                url: resp.url().to_string(),
            })
        }
    }

    /// Fail on any non-2xx status, otherwise decode the JSON body.
    ///
    /// An empty body decodes as JSON `null`.
    async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = Self::check_status(resp)?.text().await?;
        trace!(bytes = body.len(), "response body received");
        let text = if body.trim().is_empty() { "null" } else { body.as_str() };

        serde_json::from_str(text).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}
