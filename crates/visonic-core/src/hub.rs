// ── Alarm hub ──
//
// Session lifecycle, throttled refresh, and commands for one panel.
// The hub does no work on its own: a host calls `update()` on its own
// schedule and reads the latest snapshot in between.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, NaiveDateTime, Utc};
use secrecy::ExposeSecret;
use serde_json::Value;
use tokio::sync::{Mutex, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use visonic_api::models::EventRecord;
use visonic_api::{REST_VERSION, VisonicClient};

use crate::config::HubConfig;
use crate::convert::{last_event, snapshot_from_partition};
use crate::error::CoreError;
use crate::model::sensor::{SensorClass, derive_sensor_state, is_sensor_candidate};
use crate::model::{
    Device, LastEvent, MappedState, PanelInfo, PanelSnapshot, SensorReading, StateMapper,
};
use crate::notify::{Notifier, TracingNotifier, titles};
use crate::store::SnapshotStore;

const WRONG_ARM_CODE: &str = "You entered the wrong arm code.";
const WRONG_DISARM_CODE: &str = "You entered the wrong disarm code.";
const NOT_READY: &str =
    "The alarm system is not in a ready state. Maybe there are doors or windows open?";

// ── Public enums ─────────────────────────────────────────────────

/// Session state observable by hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

/// What a call to [`AlarmHub::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A full status + device refresh ran.
    Refreshed,
    /// The last refresh is younger than the refresh interval.
    Throttled,
    /// Another refresh was running; the current snapshot stands.
    InFlight,
}

/// Arm mode of an arm command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmMode {
    Home,
    Away,
}

// ── AlarmHub ─────────────────────────────────────────────────────

/// Entry point for hosts.
///
/// Cheaply cloneable via `Arc<HubInner>`. Owns the session to one panel
/// and the last snapshot fetched through it.
#[derive(Clone)]
pub struct AlarmHub {
    inner: Arc<HubInner>,
}

struct HubInner {
    config: HubConfig,
    client: VisonicClient,
    mapper: StateMapper,
    store: SnapshotStore,
    notifier: Arc<dyn Notifier>,
    /// Held for the duration of a refresh. Stores when the last one
    /// completed.
    refresh: Mutex<Option<Instant>>,
    master_user: RwLock<Option<bool>>,
    connection_state: watch::Sender<ConnectionState>,
}

impl AlarmHub {
    /// Build a hub. Does NOT connect; call [`connect()`](Self::connect).
    pub fn new(config: HubConfig) -> Result<Self, CoreError> {
        Self::with_notifier(config, Arc::new(TracingNotifier))
    }

    pub fn with_notifier(
        config: HubConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, CoreError> {
        let client = VisonicClient::new(
            config.root_url.clone(),
            config.credentials(),
            &config.transport(),
        )?;
        let mapper = StateMapper::new().with_aliases(config.state_aliases.iter().cloned());
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);

        Ok(Self {
            inner: Arc::new(HubInner {
                config,
                client,
                mapper,
                store: SnapshotStore::new(),
                notifier,
                refresh: Mutex::new(None),
                master_user: RwLock::new(None),
                connection_state,
            }),
        })
    }

    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.inner.store
    }

    pub fn client(&self) -> &VisonicClient {
        &self.inner.client
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.inner.connection_state.borrow()
    }

    fn set_state(&self, state: ConnectionState) {
        self.inner.connection_state.send_replace(state);
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Check server and panel, log in, and fetch the first snapshot.
    ///
    /// Any failing step aborts the whole sequence; nothing is retried.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let mut last_refresh = self.inner.refresh.lock().await;
        self.set_state(ConnectionState::Connecting);

        let result = async {
            self.establish_session().await?;
            self.refresh_snapshot().await
        }
        .await;

        match result {
            Ok(()) => {
                *last_refresh = Some(Instant::now());
                self.set_state(ConnectionState::Connected);
                info!(panel = %self.inner.config.panel_id, "connected");
                Ok(())
            }
            Err(e) => {
                self.set_state(ConnectionState::Failed);
                Err(e)
            }
        }
    }

    /// Version check, panel lookup, login, master-user flag, panel info.
    async fn establish_session(&self) -> Result<(), CoreError> {
        let client = &self.inner.client;

        let versions = client.get_version_info().await?;
        if !versions.supports(REST_VERSION) {
            return Err(CoreError::VersionUnsupported {
                supported: versions.rest_versions,
            });
        }

        if !client.panel_exists().await? {
            return Err(CoreError::PanelNotFound {
                panel_id: self.inner.config.panel_id.clone(),
            });
        }

        client.login().await?;

        let master = client.is_master_user().await?;
        *self
            .inner
            .master_user
            .write()
            .expect("master_user lock poisoned") = Some(master);

        let info: PanelInfo = client.get_general_panel_info().await?.into();
        debug!(name = ?info.name, serial = ?info.serial, model = ?info.model, "panel info");
        self.inner.store.replace_info(info);

        Ok(())
    }

    /// Drop the session token. The next update reconnects.
    pub fn disconnect(&self) {
        self.inner.client.clear_session();
        self.set_state(ConnectionState::Disconnected);
    }

    /// Whether the server still accepts the current session token.
    pub async fn is_token_valid(&self) -> Result<bool, CoreError> {
        Ok(self.inner.client.is_token_valid().await?)
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Refresh panel status and devices, subject to the throttle.
    ///
    /// Unforced calls return [`UpdateOutcome::Throttled`] when the last
    /// refresh is younger than the refresh interval, and
    /// [`UpdateOutcome::InFlight`] without waiting when another refresh
    /// is running. Forced calls wait for a running refresh to finish and
    /// then always refresh.
    ///
    /// Without a session the full connect sequence runs first. An HTTP
    /// error from the status call means the token is no longer trusted:
    /// the session is re-established and the refresh retried once. A
    /// network error leaves the previous snapshot in place.
    pub async fn update(&self, force: bool) -> Result<UpdateOutcome, CoreError> {
        let mut last_refresh = if force {
            self.inner.refresh.lock().await
        } else if let Ok(guard) = self.inner.refresh.try_lock() {
            guard
        } else {
            debug!("refresh already in flight");
            return Ok(UpdateOutcome::InFlight);
        };

        let interval = self.inner.config.refresh_interval;
        let fresh = last_refresh.is_some_and(|at| at.elapsed() < interval);
        if !force && fresh {
            debug!("refresh throttled");
            return Ok(UpdateOutcome::Throttled);
        }

        if !self.inner.client.has_session() {
            self.reconnect().await?;
        }

        match self.refresh_snapshot().await {
            Ok(()) => {}
            Err(e) if e.invalidates_session() => {
                warn!(error = %e, "session rejected, reconnecting");
                self.inner.client.clear_session();
                self.reconnect().await?;
                self.refresh_snapshot().await?;
            }
            Err(e) => {
                warn!(error = %e, "refresh failed, keeping previous snapshot");
                return Err(e);
            }
        }

        *last_refresh = Some(Instant::now());
        Ok(UpdateOutcome::Refreshed)
    }

    async fn reconnect(&self) -> Result<(), CoreError> {
        self.set_state(ConnectionState::Connecting);
        match self.establish_session().await {
            Ok(()) => {
                self.set_state(ConnectionState::Connected);
                Ok(())
            }
            Err(e) => {
                self.inner.client.clear_session();
                self.set_state(ConnectionState::Disconnected);
                Err(e)
            }
        }
    }

    /// Fetch status and devices, then swap both into the store.
    async fn refresh_snapshot(&self) -> Result<(), CoreError> {
        let client = &self.inner.client;

        let status = client.get_status().await?;
        let partition = status
            .partitions
            .first()
            .ok_or_else(|| CoreError::Protocol {
                message: "status response lists no partitions".into(),
            })?;
        let snapshot =
            snapshot_from_partition(partition, status.is_connected, &self.inner.mapper, Utc::now());

        let devices: Vec<Device> = client
            .get_all_devices()
            .await?
            .into_iter()
            .map(Device::from)
            .collect();

        if let MappedState::Unparsed(raw) = &snapshot.state {
            let previous = self.inner.store.panel();
            let already_reported = previous.is_some_and(|p| p.state == snapshot.state);
            warn!(raw_state = %raw, "unable to parse alarm state");
            if !already_reported {
                self.inner.notifier.notify(
                    titles::ALARM_STATE_ERROR,
                    &format!("Unknown alarm state: {raw}"),
                );
            }
        }

        debug!(
            state = %snapshot.state,
            ready = snapshot.ready,
            devices = devices.len(),
            "snapshot refreshed"
        );
        self.inner.store.replace_panel(snapshot);
        self.inner.store.replace_devices(devices);
        Ok(())
    }

    // ── Snapshot accessors ───────────────────────────────────────

    pub fn snapshot(&self) -> Option<Arc<PanelSnapshot>> {
        self.inner.store.panel()
    }

    pub fn ready(&self) -> bool {
        self.snapshot().is_some_and(|s| s.ready)
    }

    pub fn raw_state(&self) -> Option<String> {
        self.snapshot().map(|s| s.raw_state.clone())
    }

    pub fn state(&self) -> Option<MappedState> {
        self.snapshot().map(|s| s.state.clone())
    }

    pub fn active(&self) -> bool {
        self.snapshot().is_some_and(|s| s.active)
    }

    pub fn connected(&self) -> bool {
        self.snapshot().is_some_and(|s| s.connected)
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.snapshot().map(|s| s.last_refresh)
    }

    pub fn panel_info(&self) -> PanelInfo {
        self.inner
            .store
            .info()
            .map(|info| (*info).clone())
            .unwrap_or_default()
    }

    /// `None` until the first successful connect.
    pub fn is_master_user(&self) -> Option<bool> {
        *self
            .inner
            .master_user
            .read()
            .expect("master_user lock poisoned")
    }

    pub fn session_token_issued(&self) -> Option<DateTime<Utc>> {
        self.inner.client.session_token().map(|t| t.issued_at)
    }

    pub fn devices(&self) -> Arc<Vec<Device>> {
        self.inner.store.devices()
    }

    pub fn device_by_id(&self, id: &str) -> Option<Device> {
        self.inner.store.device_by_id(id)
    }

    /// Contact, motion, and curtain devices with their derived state.
    pub fn sensor_devices(&self) -> Vec<SensorReading> {
        let panel_state = self
            .state()
            .unwrap_or_else(|| MappedState::Unparsed(String::new()));
        self.devices()
            .iter()
            .filter(|d| is_sensor_candidate(d))
            .map(|d| SensorReading {
                class: SensorClass::of(&d.subtype),
                state: derive_sensor_state(d, &panel_state),
                device: d.clone(),
            })
            .collect()
    }

    // ── On-demand reads ──────────────────────────────────────────

    /// The full event log, oldest first.
    pub async fn events(&self) -> Result<Vec<EventRecord>, CoreError> {
        Ok(self.inner.client.get_events().await?)
    }

    /// Decode the most recent event, shifting its time by `hour_offset`.
    pub async fn get_last_event(&self, hour_offset: i32) -> Result<Option<LastEvent>, CoreError> {
        let events = self.events().await?;
        Ok(last_event(&events, hour_offset))
    }

    pub async fn alarms(&self) -> Result<Value, CoreError> {
        Ok(self.inner.client.get_alarms().await?)
    }

    pub async fn alerts(&self) -> Result<Value, CoreError> {
        Ok(self.inner.client.get_alerts().await?)
    }

    pub async fn troubles(&self) -> Result<Value, CoreError> {
        Ok(self.inner.client.get_troubles().await?)
    }

    pub async fn locations(&self) -> Result<Value, CoreError> {
        Ok(self.inner.client.get_locations().await?)
    }

    pub async fn active_users_info(&self) -> Result<Value, CoreError> {
        Ok(self.inner.client.get_active_users_info().await?)
    }

    pub async fn wakeup_sms(&self) -> Result<Value, CoreError> {
        Ok(self.inner.client.get_wakeup_sms().await?)
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Arm home; routed to the instant endpoint when `arm_instant` is set.
    pub async fn arm_home(&self, code: Option<&str>) -> Result<(), CoreError> {
        let instant = self.inner.config.poll.arm_instant;
        self.arm(ArmMode::Home, instant, code).await
    }

    pub async fn arm_home_instant(&self, code: Option<&str>) -> Result<(), CoreError> {
        self.arm(ArmMode::Home, true, code).await
    }

    /// Arm away; routed to the instant endpoint when `arm_instant` is set.
    pub async fn arm_away(&self, code: Option<&str>) -> Result<(), CoreError> {
        let instant = self.inner.config.poll.arm_instant;
        self.arm(ArmMode::Away, instant, code).await
    }

    pub async fn arm_away_instant(&self, code: Option<&str>) -> Result<(), CoreError> {
        self.arm(ArmMode::Away, true, code).await
    }

    /// PIN check, ready gate, command, then a forced refresh after the
    /// settle delay.
    pub async fn arm(
        &self,
        mode: ArmMode,
        instant: bool,
        code: Option<&str>,
    ) -> Result<(), CoreError> {
        self.check_code(code, titles::ARM_FAILED, WRONG_ARM_CODE)?;

        let Some(snapshot) = self.snapshot() else {
            return Err(CoreError::NotConnected);
        };
        if !snapshot.ready {
            warn!(?mode, "panel not ready, arm rejected");
            self.inner.notifier.notify(titles::ARM_FAILED, NOT_READY);
            return Err(CoreError::NotReady);
        }

        let client = &self.inner.client;
        match (mode, instant) {
            (ArmMode::Home, false) => client.arm_home().await?,
            (ArmMode::Home, true) => client.arm_home_instant().await?,
            (ArmMode::Away, false) => client.arm_away().await?,
            (ArmMode::Away, true) => client.arm_away_instant().await?,
        }
        info!(?mode, instant, "arm command accepted");

        self.settle_and_refresh().await;
        Ok(())
    }

    pub async fn disarm(&self, code: Option<&str>) -> Result<(), CoreError> {
        self.check_code(code, titles::DISARM_FAILED, WRONG_DISARM_CODE)?;

        self.inner.client.disarm().await?;
        info!("disarm command accepted");

        self.settle_and_refresh().await;
        Ok(())
    }

    /// Set the panel clock. The server only allows this for master users.
    pub async fn set_date_time(&self, time: NaiveDateTime) -> Result<(), CoreError> {
        Ok(self.inner.client.set_date_time(time).await?)
    }

    fn check_code(&self, code: Option<&str>, title: &str, message: &str) -> Result<(), CoreError> {
        if self.inner.config.poll.no_pin_required {
            return Ok(());
        }
        if code == Some(self.inner.config.user_code.expose_secret()) {
            return Ok(());
        }
        warn!(title, "command rejected: wrong code");
        self.inner.notifier.notify(title, message);
        Err(CoreError::WrongCode)
    }

    /// The panel moves through exit/entry delays asynchronously; give it
    /// a moment before looking. A failed refresh does not fail the
    /// command that was already accepted.
    async fn settle_and_refresh(&self) {
        tokio::time::sleep(self.inner.config.settle_delay).await;
        if let Err(e) = self.update(true).await {
            warn!(error = %e, "refresh after command failed");
        }
    }
}
