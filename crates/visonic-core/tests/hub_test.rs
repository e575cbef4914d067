#![allow(clippy::unwrap_used)]
// Integration tests for `AlarmHub` against a wiremock panel server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use visonic_core::{
    AlarmHub, AlarmState, ConnectionState, ContactState, CoreError, DeviceKind, EventAction,
    HubConfig, MappedState, RecordingNotifier, SensorState, UpdateOutcome,
};

const USER_ID: &str = "2d3f1c4e-8a7b-4c2d-9e1f-0a1b2c3d4e5f";
const PANEL_ID: &str = "123456";

// ── Helpers ─────────────────────────────────────────────────────────

fn api_path(suffix: &str) -> String {
    format!("/rest_api/4.0/{suffix}")
}

fn config(server: &MockServer) -> HubConfig {
    let mut config =
        HubConfig::new(&server.uri(), "1234".to_string().into(), USER_ID, PANEL_ID).unwrap();
    config.refresh_interval = Duration::from_secs(60);
    config.settle_delay = Duration::ZERO;
    config
}

fn hub_with(config: HubConfig) -> (AlarmHub, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let hub = AlarmHub::with_notifier(config, notifier.clone()).unwrap();
    (hub, notifier)
}

fn status_body(state: &str, ready: bool) -> Value {
    json!({
        "is_connected": true,
        "partitions": [{
            "partition": "ALL",
            "ready_status": ready,
            "state": state,
            "active": true
        }]
    })
}

fn devices_body() -> Value {
    json!([
        {
            "device_id": "1",
            "zone": "PERIMETER",
            "location": "Front door",
            "device_type": "ZONE",
            "type": "CONTACT",
            "subtype": "CONTACT_AUX",
            "troubles": ["OPENED"]
        },
        {
            "device_id": "2",
            "zone": "INTERIOR",
            "location": "Living room",
            "device_type": "ZONE",
            "type": "MOTION",
            "subtype": "MOTION",
            "troubles": []
        },
        {
            "device_id": "3",
            "zone": "24H SILENT",
            "location": "Office",
            "device_type": "ZONE",
            "type": "MOTION",
            "subtype": "CURTAIN",
            "troubles": null
        },
        {
            "device_id": "4",
            "zone": "FIRE",
            "location": "Kitchen",
            "device_type": "ZONE",
            "type": "SMOKE",
            "subtype": "SMOKE"
        }
    ])
}

/// Mount everything `connect()` touches before the status call.
async fn mount_session(server: &MockServer, logins: u64) {
    Mock::given(method("GET"))
        .and(path("/rest_api/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rest_versions": ["4.0"] })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("is_panel_exists")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "session_token": "abc" })))
        .expect(logins)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("is_master_user")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "is_master_user": true })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("general_panel_info")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Home",
            "serial": "ABC123",
            "model": "PowerMaster-30"
        })))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, state: &str, ready: bool, calls: u64) {
    Mock::given(method("GET"))
        .and(path(api_path("status")))
        .and(header("Session-Token", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body(state, ready)))
        .expect(calls)
        .mount(server)
        .await;
}

async fn mount_devices(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(api_path("all_devices")))
        .respond_with(ResponseTemplate::new(200).set_body_json(devices_body()))
        .mount(server)
        .await;
}

async fn mount_command(server: &MockServer, endpoint: &str, calls: u64) {
    Mock::given(method("POST"))
        .and(path(api_path(endpoint)))
        .and(body_json(json!({ "partition": "ALL" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(calls)
        .mount(server)
        .await;
}

/// Replays a fixed list of responses, repeating the last one.
struct Sequence {
    responses: Vec<ResponseTemplate>,
    calls: AtomicUsize,
}

impl Sequence {
    fn new(responses: Vec<ResponseTemplate>) -> Self {
        Self {
            responses,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Respond for Sequence {
    fn respond(&self, _: &Request) -> ResponseTemplate {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let idx = n.min(self.responses.len() - 1);
        self.responses[idx].clone()
    }
}

// ── Connect ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_fetches_identity_and_first_snapshot() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Home Instant", true, 1).await;
    mount_devices(&server).await;

    let (hub, notifier) = hub_with(config(&server));
    assert_eq!(hub.connection_state(), ConnectionState::Disconnected);

    hub.connect().await.unwrap();

    assert_eq!(hub.connection_state(), ConnectionState::Connected);
    assert_eq!(hub.state(), Some(MappedState::Known(AlarmState::ArmedHome)));
    assert_eq!(hub.raw_state().as_deref(), Some("Home Instant"));
    assert!(hub.ready());
    assert!(hub.active());
    assert!(hub.connected());
    assert!(hub.last_refresh().is_some());
    assert!(hub.session_token_issued().is_some());
    assert_eq!(hub.is_master_user(), Some(true));

    let info = hub.panel_info();
    assert_eq!(info.serial.as_deref(), Some("ABC123"));
    assert_eq!(info.model.as_deref(), Some("PowerMaster-30"));

    let devices = hub.devices();
    assert_eq!(devices.len(), 4);
    let door = hub.device_by_id("1").unwrap();
    assert_eq!(door.kind, DeviceKind::Contact);
    assert_eq!(door.contact_state(), Some(ContactState::Opened));
    assert_eq!(hub.device_by_id("4").unwrap().kind, DeviceKind::Smoke);

    assert!(notifier.take().is_empty());
}

#[tokio::test]
async fn test_connect_rejects_unsupported_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest_api/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rest_versions": ["2.0"] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (hub, _) = hub_with(config(&server));
    let result = hub.connect().await;

    assert!(
        matches!(result, Err(CoreError::VersionUnsupported { ref supported }) if supported == &["2.0".to_string()]),
        "expected VersionUnsupported, got: {result:?}"
    );
    assert_eq!(hub.connection_state(), ConnectionState::Failed);
}

#[tokio::test]
async fn test_connect_rejects_unknown_panel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest_api/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rest_versions": ["4.0"] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("is_panel_exists")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
        .mount(&server)
        .await;

    let (hub, _) = hub_with(config(&server));
    let result = hub.connect().await;

    assert!(matches!(result, Err(CoreError::PanelNotFound { ref panel_id }) if panel_id == PANEL_ID));
}

#[tokio::test]
async fn test_connect_surfaces_login_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest_api/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rest_versions": ["4.0"] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("is_panel_exists")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (hub, _) = hub_with(config(&server));
    let result = hub.connect().await;

    assert!(matches!(result, Err(CoreError::AuthenticationFailed { .. })));
    assert!(hub.snapshot().is_none());
}

// ── Update / throttle ───────────────────────────────────────────────

#[tokio::test]
async fn test_update_within_interval_is_throttled() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Disarm", true, 1).await;
    mount_devices(&server).await;

    let (hub, _) = hub_with(config(&server));
    hub.connect().await.unwrap();

    assert_eq!(hub.update(false).await.unwrap(), UpdateOutcome::Throttled);
    assert_eq!(hub.update(false).await.unwrap(), UpdateOutcome::Throttled);
}

#[tokio::test]
async fn test_forced_update_always_refreshes() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Disarm", true, 3).await;
    mount_devices(&server).await;

    let (hub, _) = hub_with(config(&server));
    hub.connect().await.unwrap();

    assert_eq!(hub.update(true).await.unwrap(), UpdateOutcome::Refreshed);
    assert_eq!(hub.update(true).await.unwrap(), UpdateOutcome::Refreshed);
}

#[tokio::test]
async fn test_update_after_interval_refreshes() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Disarm", true, 2).await;
    mount_devices(&server).await;

    let mut config = config(&server);
    config.refresh_interval = Duration::ZERO;
    let (hub, _) = hub_with(config);
    hub.connect().await.unwrap();

    assert_eq!(hub.update(false).await.unwrap(), UpdateOutcome::Refreshed);
}

#[tokio::test]
async fn test_update_without_session_connects_first() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Away", true, 1).await;
    mount_devices(&server).await;

    let (hub, _) = hub_with(config(&server));

    assert_eq!(hub.update(false).await.unwrap(), UpdateOutcome::Refreshed);
    assert_eq!(hub.state(), Some(MappedState::Known(AlarmState::ArmedAway)));
    assert_eq!(hub.panel_info().name.as_deref(), Some("Home"));
}

#[tokio::test]
async fn test_unforced_update_during_refresh_returns_in_flight() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(api_path("status")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(status_body("Disarm", true))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(2)
        .mount(&server)
        .await;
    mount_devices(&server).await;

    let mut config = config(&server);
    config.refresh_interval = Duration::ZERO;
    let (hub, _) = hub_with(config);
    hub.connect().await.unwrap();

    let (forced, unforced) = tokio::join!(hub.update(true), hub.update(false));

    assert_eq!(forced.unwrap(), UpdateOutcome::Refreshed);
    assert_eq!(unforced.unwrap(), UpdateOutcome::InFlight);
}

#[tokio::test]
async fn test_http_error_triggers_reconnect() {
    let server = MockServer::start().await;
    mount_session(&server, 2).await;
    Mock::given(method("GET"))
        .and(path(api_path("status")))
        .respond_with(Sequence::new(vec![
            ResponseTemplate::new(200).set_body_json(status_body("Disarm", true)),
            ResponseTemplate::new(401),
            ResponseTemplate::new(200).set_body_json(status_body("Away", true)),
        ]))
        .expect(3)
        .mount(&server)
        .await;
    mount_devices(&server).await;

    let (hub, _) = hub_with(config(&server));
    hub.connect().await.unwrap();

    assert_eq!(hub.update(true).await.unwrap(), UpdateOutcome::Refreshed);
    assert_eq!(hub.state(), Some(MappedState::Known(AlarmState::ArmedAway)));
    assert_eq!(hub.connection_state(), ConnectionState::Connected);
}

#[tokio::test]
async fn test_network_error_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(api_path("status")))
        .respond_with(Sequence::new(vec![
            ResponseTemplate::new(200).set_body_json(status_body("Home", true)),
            ResponseTemplate::new(200)
                .set_body_json(status_body("Away", true))
                .set_delay(Duration::from_secs(5)),
        ]))
        .mount(&server)
        .await;
    mount_devices(&server).await;

    let mut config = config(&server);
    config.timeout = Duration::from_millis(300);
    let (hub, _) = hub_with(config);
    hub.connect().await.unwrap();

    // the second status call outlives the client timeout
    let result = hub.update(true).await;

    assert!(matches!(result, Err(CoreError::Network { .. })), "got: {result:?}");
    assert_eq!(hub.state(), Some(MappedState::Known(AlarmState::ArmedHome)));
    assert_eq!(hub.devices().len(), 4);
}

#[tokio::test]
async fn test_unparsed_state_is_reported_once() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Night", true, 2).await;
    mount_devices(&server).await;

    let (hub, notifier) = hub_with(config(&server));
    hub.connect().await.unwrap();
    hub.update(true).await.unwrap();

    assert_eq!(hub.state(), Some(MappedState::Unparsed("Night".into())));
    let seen = notifier.take();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].title, "Alarm State Error");
    assert!(seen[0].message.contains("Night"));
}

#[tokio::test]
async fn test_padded_unparsed_state_is_reported_once() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Night ", true, 3).await;
    mount_devices(&server).await;

    let (hub, notifier) = hub_with(config(&server));
    hub.connect().await.unwrap();
    hub.update(true).await.unwrap();
    hub.update(true).await.unwrap();

    assert_eq!(hub.state(), Some(MappedState::Unparsed("Night ".into())));
    assert_eq!(notifier.take().len(), 1);
}

#[tokio::test]
async fn test_configured_alias_extends_state_table() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Night", true, 1).await;
    mount_devices(&server).await;

    let mut config = config(&server);
    config.state_aliases = vec![("Night".into(), AlarmState::ArmedHome)];
    let (hub, notifier) = hub_with(config);
    hub.connect().await.unwrap();

    assert_eq!(hub.state(), Some(MappedState::Known(AlarmState::ArmedHome)));
    assert!(notifier.take().is_empty());
}

// ── Sensors / events ────────────────────────────────────────────────

#[tokio::test]
async fn test_sensor_devices_follow_arm_state() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Home", true, 1).await;
    mount_devices(&server).await;

    let (hub, _) = hub_with(config(&server));
    hub.connect().await.unwrap();

    let sensors = hub.sensor_devices();
    let state_of = |id: &str| {
        sensors
            .iter()
            .find(|s| s.device.id == id)
            .map(|s| s.state)
            .unwrap()
    };

    assert_eq!(sensors.len(), 3);
    assert_eq!(state_of("1"), SensorState::Open);
    assert_eq!(state_of("2"), SensorState::Off);
    assert_eq!(state_of("3"), SensorState::On);
}

#[tokio::test]
async fn test_last_event_decodes_most_recent_entry() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Disarm", true, 1).await;
    mount_devices(&server).await;
    Mock::given(method("GET"))
        .and(path(api_path("events")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "event": 10, "type_id": 85, "appointment": "User 2", "datetime": "2024-03-01 07:00:00" },
            { "event": 11, "type_id": 89, "appointment": "User 1", "datetime": "2024-03-01 17:45:10" }
        ])))
        .mount(&server)
        .await;

    let (hub, _) = hub_with(config(&server));
    hub.connect().await.unwrap();

    let event = hub.get_last_event(-1).await.unwrap().unwrap();
    assert_eq!(event.event_id, Some(11));
    assert_eq!(event.action, EventAction::Disarm);
    assert_eq!(event.user.as_deref(), Some("User 1"));
    assert_eq!(event.timestamp_display(), "2024-03-01 16:45:10");
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_arm_when_not_ready_sends_nothing() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Disarm", false, 1).await;
    mount_devices(&server).await;
    mount_command(&server, "arm_home", 0).await;
    mount_command(&server, "arm_away", 0).await;

    let (hub, notifier) = hub_with(config(&server));
    hub.connect().await.unwrap();

    let home = hub.arm_home(Some("1234")).await;
    let away = hub.arm_away(Some("1234")).await;

    assert!(matches!(home, Err(CoreError::NotReady)));
    assert!(matches!(away, Err(CoreError::NotReady)));
    let seen = notifier.take();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|n| n.title == "Arm Failed"));
}

#[tokio::test]
async fn test_wrong_code_is_rejected_locally() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Away", true, 1).await;
    mount_devices(&server).await;
    mount_command(&server, "arm_away", 0).await;
    mount_command(&server, "disarm", 0).await;

    let (hub, notifier) = hub_with(config(&server));
    hub.connect().await.unwrap();

    assert!(matches!(hub.arm_away(Some("0000")).await, Err(CoreError::WrongCode)));
    assert!(matches!(hub.disarm(None).await, Err(CoreError::WrongCode)));

    let titles: Vec<String> = notifier.take().into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["Arm Failed".to_string(), "Disarm Failed".to_string()]);
}

#[tokio::test]
async fn test_disarm_sends_command_then_refreshes() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Away", true, 2).await;
    mount_devices(&server).await;
    mount_command(&server, "disarm", 1).await;

    let (hub, _) = hub_with(config(&server));
    hub.connect().await.unwrap();

    hub.disarm(Some("1234")).await.unwrap();
}

#[tokio::test]
async fn test_command_with_plain_text_answer_still_refreshes() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Away", true, 2).await;
    mount_devices(&server).await;
    Mock::given(method("POST"))
        .and(path(api_path("disarm")))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let (hub, notifier) = hub_with(config(&server));
    hub.connect().await.unwrap();

    hub.disarm(Some("1234")).await.unwrap();
    assert!(notifier.take().is_empty());
}

#[tokio::test]
async fn test_no_pin_mode_skips_code_check() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Disarm", true, 2).await;
    mount_devices(&server).await;
    mount_command(&server, "arm_away", 1).await;

    let mut config = config(&server);
    config.poll.no_pin_required = true;
    let (hub, notifier) = hub_with(config);
    hub.connect().await.unwrap();

    hub.arm_away(None).await.unwrap();
    assert!(notifier.take().is_empty());
}

#[tokio::test]
async fn test_instant_preference_routes_to_instant_endpoint() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_status(&server, "Disarm", true, 3).await;
    mount_devices(&server).await;
    mount_command(&server, "arm_home", 0).await;
    mount_command(&server, "arm_home_instant", 2).await;

    let mut config = config(&server);
    config.poll.arm_instant = true;
    let (hub, _) = hub_with(config);
    hub.connect().await.unwrap();

    hub.arm_home(Some("1234")).await.unwrap();
    hub.arm_home_instant(Some("1234")).await.unwrap();
}

#[tokio::test]
async fn test_command_before_connect_is_not_connected() {
    let server = MockServer::start().await;
    let (hub, _) = hub_with(config(&server));

    let result = hub.arm_home(Some("1234")).await;
    assert!(matches!(result, Err(CoreError::NotConnected)));
}
