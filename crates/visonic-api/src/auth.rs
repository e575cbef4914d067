// Session establishment
//
// Version discovery, panel lookup, login, and session introspection.
// Login answers with a session token in the body; the client stores it
// and attaches it as the `Session-Token` header on every later call.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::client::{APP_TYPE, VisonicClient};
use crate::error::Error;
use crate::models::{LoginRequest, LoginResponse, MasterUser, PanelExists, VersionInfo};

/// Everything needed to log in to one panel.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Numeric PIN of the panel user.
    pub user_code: SecretString,
    /// UUID identifying this installation to the server.
    pub user_id: String,
    /// Panel web name (the panel id shown in the Visonic app).
    pub panel_id: String,
    /// Partition selector sent with commands, `"ALL"` for every partition.
    pub partition: String,
}

impl Credentials {
    pub fn new(
        user_code: SecretString,
        user_id: impl Into<String>,
        panel_id: impl Into<String>,
    ) -> Self {
        Self {
            user_code,
            user_id: user_id.into(),
            panel_id: panel_id.into(),
            partition: "ALL".into(),
        }
    }

    #[must_use]
    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = partition.into();
        self
    }
}

/// An issued session token and when this client received it.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: SecretString,
    pub issued_at: DateTime<Utc>,
}

impl VisonicClient {
    /// List the REST API versions the server speaks.
    ///
    /// `GET /rest_api/version` (unauthenticated)
    pub async fn get_version_info(&self) -> Result<VersionInfo, Error> {
        let url = self.version_url()?;
        self.send_get(url, false).await
    }

    /// Whether the configured panel is registered on this server.
    ///
    /// `GET /is_panel_exists?panel_web_name=...` (unauthenticated)
    pub async fn panel_exists(&self) -> Result<bool, Error> {
        let mut url = self.api_url("is_panel_exists")?;
        url.query_pairs_mut()
            .append_pair("panel_web_name", &self.credentials().panel_id);
        let resp: PanelExists = self.send_get(url, false).await?;
        Ok(resp.exists())
    }

    /// Log in and store the returned session token.
    ///
    /// Any non-2xx answer is reported as [`Error::Authentication`].
    pub async fn login(&self) -> Result<(), Error> {
        let url = self.api_url("login")?;
        let creds = self.credentials();
        let body = LoginRequest {
            user_code: creds.user_code.expose_secret(),
            app_type: APP_TYPE,
            user_id: &creds.user_id,
            panel_web_name: &creds.panel_id,
        };

        debug!(panel = %creds.panel_id, "logging in");

        let resp: LoginResponse = match self.send_post(url, &body, false).await {
            Ok(resp) => resp,
            Err(Error::Http { status, .. }) => {
                warn!(status, "login rejected");
                self.clear_session();
                return Err(Error::Authentication {
                    message: format!("login rejected (HTTP {status})"),
                });
            }
            Err(e) => return Err(e),
        };

        self.set_session_token(resp.session_token);
        debug!("login successful");
        Ok(())
    }

    /// Whether the logged-in user is the panel's master user.
    ///
    /// `GET /is_master_user`
    pub async fn is_master_user(&self) -> Result<bool, Error> {
        let url = self.api_url("is_master_user")?;
        let resp: MasterUser = self.send_get(url, true).await?;
        Ok(resp.is_master_user)
    }

    /// Probe the session by fetching the panel status.
    ///
    /// Returns `false` when no token is held or the server answers with
    /// an HTTP error; transport failures are propagated.
    pub async fn is_token_valid(&self) -> Result<bool, Error> {
        if !self.has_session() {
            return Ok(false);
        }
        match self.get_status().await {
            Ok(_) => Ok(true),
            Err(Error::Http { .. } | Error::MissingToken) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
