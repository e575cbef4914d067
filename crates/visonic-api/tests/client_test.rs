#![allow(clippy::unwrap_used)]
// Integration tests for `VisonicClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use visonic_api::{Credentials, Error, VisonicClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, VisonicClient) {
    let server = MockServer::start().await;
    let root_url = Url::parse(&server.uri()).unwrap();
    let credentials = Credentials::new(
        "1234".to_string().into(),
        "2d3f1c4e-8a7b-4c2d-9e1f-0a1b2c3d4e5f",
        "123456",
    );
    let client = VisonicClient::with_client(reqwest::Client::new(), root_url, credentials);
    (server, client)
}

fn api_path(suffix: &str) -> String {
    format!("/rest_api/4.0/{suffix}")
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "session_token": token })))
        .mount(server)
        .await;
}

// ── Session tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_version_info() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest_api/version"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "rest_versions": ["2.0", "4.0"] })),
        )
        .mount(&server)
        .await;

    let info = client.get_version_info().await.unwrap();
    assert!(info.supports("4.0"));
}

#[tokio::test]
async fn test_panel_exists_sends_panel_web_name() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("is_panel_exists")))
        .and(query_param("panel_web_name", "123456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.panel_exists().await.unwrap());
}

#[tokio::test]
async fn test_login_sends_credentials_and_stores_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .and(body_json(json!({
            "user_code": "1234",
            "app_type": "com.visonic.PowerMaxApp",
            "user_id": "2d3f1c4e-8a7b-4c2d-9e1f-0a1b2c3d4e5f",
            "panel_web_name": "123456"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "session_token": "abc" })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(!client.has_session());
    client.login().await.unwrap();
    assert!(client.has_session());
    assert!(client.session_token().is_some());
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let result = client.login().await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.has_session());
}

#[tokio::test]
async fn test_authenticated_calls_send_session_token_header() {
    let (server, client) = setup().await;
    mount_login(&server, "abc").await;

    Mock::given(method("GET"))
        .and(path(api_path("status")))
        .and(header("Session-Token", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_connected": true,
            "partitions": [{ "partition": -1, "ready_status": true, "state": "Disarm" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.login().await.unwrap();
    let status = client.get_status().await.unwrap();

    assert!(status.is_connected);
    assert_eq!(status.partitions.len(), 1);
    assert_eq!(status.partitions[0].state, "Disarm");
    assert_eq!(status.partitions[0].partition.as_deref(), Some("-1"));
    assert!(status.partitions[0].ready_status);
}

#[tokio::test]
async fn test_authenticated_call_without_login_fails_locally() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("status")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.get_status().await;
    assert!(matches!(result, Err(Error::MissingToken)));
}

#[tokio::test]
async fn test_is_token_valid_reports_rejected_session() {
    let (server, client) = setup().await;
    mount_login(&server, "stale").await;

    Mock::given(method("GET"))
        .and(path(api_path("status")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert!(!client.is_token_valid().await.unwrap());
    client.login().await.unwrap();
    assert!(!client.is_token_valid().await.unwrap());
}

#[tokio::test]
async fn test_is_master_user() {
    let (server, client) = setup().await;
    mount_login(&server, "abc").await;

    Mock::given(method("GET"))
        .and(path(api_path("is_master_user")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "is_master_user": true })))
        .mount(&server)
        .await;

    client.login().await.unwrap();
    assert!(client.is_master_user().await.unwrap());
}

// ── Read endpoint tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_get_all_devices() {
    let (server, client) = setup().await;
    mount_login(&server, "abc").await;

    Mock::given(method("GET"))
        .and(path(api_path("all_devices")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "device_id": "100",
                "zone": "1",
                "location": "Hall",
                "device_type": "ZONE",
                "type": "CONTACT",
                "subtype": "CONTACT",
                "troubles": ["OPENED"],
                "partitions": ["1"]
            },
            {
                "device_id": 101,
                "zone": "2",
                "location": "Living room",
                "device_type": "ZONE",
                "type": "MOTION",
                "subtype": "MOTION_CAMERA",
                "troubles": null
            }
        ])))
        .mount(&server)
        .await;

    client.login().await.unwrap();
    let devices = client.get_all_devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].troubles, vec!["OPENED".to_string()]);
    assert_eq!(devices[1].id, "101");
    assert_eq!(devices[1].subtype, "MOTION_CAMERA");
}

#[tokio::test]
async fn test_get_events_empty_body() {
    let (server, client) = setup().await;
    mount_login(&server, "abc").await;

    Mock::given(method("GET"))
        .and(path(api_path("events")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.login().await.unwrap();
    let events = client.get_events().await.unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_http_error_carries_status() {
    let (server, client) = setup().await;
    mount_login(&server, "abc").await;

    Mock::given(method("GET"))
        .and(path(api_path("troubles")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    client.login().await.unwrap();
    let err = client.get_troubles().await.unwrap_err();

    assert!(matches!(err, Error::Http { status: 500, .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_malformed_body_is_a_deserialization_error() {
    let (server, client) = setup().await;
    mount_login(&server, "abc").await;

    Mock::given(method("GET"))
        .and(path(api_path("status")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    client.login().await.unwrap();
    let result = client.get_status().await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

// ── Command tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_arm_commands_post_partition() {
    let (server, client) = setup().await;
    mount_login(&server, "abc").await;

    for endpoint in [
        "arm_home",
        "arm_home_instant",
        "arm_away",
        "arm_away_instant",
        "disarm",
    ] {
        Mock::given(method("POST"))
            .and(path(api_path(endpoint)))
            .and(header("Session-Token", "abc"))
            .and(body_json(json!({ "partition": "ALL" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "process_token": "x" })))
            .expect(1)
            .mount(&server)
            .await;
    }

    client.login().await.unwrap();
    client.arm_home().await.unwrap();
    client.arm_home_instant().await.unwrap();
    client.arm_away().await.unwrap();
    client.arm_away_instant().await.unwrap();
    client.disarm().await.unwrap();
}

#[tokio::test]
async fn test_set_date_time_formats_compact_timestamp() {
    let (server, client) = setup().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path(api_path("set_date_time")))
        .and(body_json(json!({ "time": "20240301T201500" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.login().await.unwrap();
    let time = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(20, 15, 0)
        .unwrap();
    client.set_date_time(time).await.unwrap();
}

#[tokio::test]
async fn test_commands_accept_any_success_body() {
    let (server, client) = setup().await;
    mount_login(&server, "abc").await;

    for endpoint in ["disarm", "set_date_time"] {
        Mock::given(method("POST"))
            .and(path(api_path(endpoint)))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&server)
            .await;
    }

    client.login().await.unwrap();
    client.disarm().await.unwrap();
    let time = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    client.set_date_time(time).await.unwrap();
}

#[tokio::test]
async fn test_command_rejected_by_server_carries_status() {
    let (server, client) = setup().await;
    mount_login(&server, "abc").await;

    Mock::given(method("POST"))
        .and(path(api_path("arm_away")))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    client.login().await.unwrap();
    let err = client.arm_away().await.unwrap_err();
    assert!(matches!(err, Error::Http { status: 403, .. }), "got: {err:?}");
}
