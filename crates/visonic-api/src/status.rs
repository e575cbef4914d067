// Read-only panel endpoints
//
// All calls here require a session token.

use serde_json::Value;

use crate::client::VisonicClient;
use crate::error::Error;
use crate::models::{DeviceRecord, EventRecord, GeneralPanelInfo, StatusResponse};

impl VisonicClient {
    /// `GET /status`
    pub async fn get_status(&self) -> Result<StatusResponse, Error> {
        let url = self.api_url("status")?;
        self.send_get(url, true).await
    }

    /// `GET /general_panel_info`
    pub async fn get_general_panel_info(&self) -> Result<GeneralPanelInfo, Error> {
        let url = self.api_url("general_panel_info")?;
        self.send_get(url, true).await
    }

    /// `GET /all_devices`
    pub async fn get_all_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        let url = self.api_url("all_devices")?;
        let devices: Option<Vec<DeviceRecord>> = self.send_get(url, true).await?;
        Ok(devices.unwrap_or_default())
    }

    /// `GET /events` -- the panel event log, oldest first.
    pub async fn get_events(&self) -> Result<Vec<EventRecord>, Error> {
        let url = self.api_url("events")?;
        let events: Option<Vec<EventRecord>> = self.send_get(url, true).await?;
        Ok(events.unwrap_or_default())
    }

    // The remaining endpoints have no stable schema across firmware
    // versions and are passed through as raw JSON.

    /// `GET /alarms`
    pub async fn get_alarms(&self) -> Result<Value, Error> {
        self.get_raw("alarms").await
    }

    /// `GET /alerts`
    pub async fn get_alerts(&self) -> Result<Value, Error> {
        self.get_raw("alerts").await
    }

    /// `GET /troubles`
    pub async fn get_troubles(&self) -> Result<Value, Error> {
        self.get_raw("troubles").await
    }

    /// `GET /locations`
    pub async fn get_locations(&self) -> Result<Value, Error> {
        self.get_raw("locations").await
    }

    /// `GET /active_users_info`
    pub async fn get_active_users_info(&self) -> Result<Value, Error> {
        self.get_raw("active_users_info").await
    }

    /// `GET /wakeup_sms`
    pub async fn get_wakeup_sms(&self) -> Result<Value, Error> {
        self.get_raw("wakeup_sms").await
    }

    async fn get_raw(&self, path: &str) -> Result<Value, Error> {
        let url = self.api_url(path)?;
        self.send_get(url, true).await
    }
}
