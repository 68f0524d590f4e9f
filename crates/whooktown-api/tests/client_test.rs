#![allow(clippy::unwrap_used)]
// Integration tests for `WhooktownClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use whooktown_api::{
    ClientConfig, Environment, Error, ServiceUrls, TrafficState, WhooktownClient,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(token: Option<&str>) -> (MockServer, WhooktownClient) {
    let server = MockServer::start().await;
    let urls = ServiceUrls::resolve(
        Environment::Development,
        Some(&server.uri()),
        Some(&server.uri()),
    )
    .unwrap();
    let client = WhooktownClient::new(ClientConfig {
        token: token.map(str::to_owned),
        urls,
    })
    .unwrap();
    (server, client)
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn check_token_parses_introspection_response() {
    let (server, client) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/v1/token/introspect"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "sensor",
            "roles": { "sensor": "rw" },
            "account_id": "acct-42"
        })))
        .mount(&server)
        .await;

    let info = client.check_token("tok-123").await.unwrap();
    assert_eq!(info.token_type, "sensor");
    assert_eq!(info.roles.get("sensor").map(String::as_str), Some("rw"));
    assert_eq!(info.account_id.as_deref(), Some("acct-42"));
}

#[tokio::test]
async fn check_token_maps_401_to_unauthorized() {
    let (server, client) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/v1/token/introspect"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "token expired" })),
        )
        .mount(&server)
        .await;

    let err = client.check_token("stale").await.unwrap_err();
    assert!(err.is_unauthorized(), "expected unauthorized, got {err:?}");
    assert!(!err.is_not_found());
}

// ── Sensor states ───────────────────────────────────────────────────

#[tokio::test]
async fn sensor_states_deserializes_free_form_fields() {
    let (server, client) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/v1/sensor-states"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "11111111-2222-3333-4444-555555555555",
            "data": { "status": "online", "activity": "fast", "cpuUsage": 75 },
            "received_at": "2025-06-01T12:00:00Z"
        }])))
        .mount(&server)
        .await;

    let sensors = client.sensor_states().await.unwrap();
    assert_eq!(sensors.len(), 1);
    assert_eq!(sensors[0].data.status.as_deref(), Some("online"));
    assert_eq!(
        sensors[0].data.extra.get("cpuUsage"),
        Some(&json!(75))
    );
    assert!(sensors[0].received_at.is_some());
}

#[tokio::test]
async fn send_sensor_data_posts_payload_verbatim() {
    let (server, client) = setup(Some("tok")).await;

    Mock::given(method("POST"))
        .and(path("/v1/sensor-data"))
        .and(body_json(json!({ "id": "s1", "status": "online" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut payload = serde_json::Map::new();
    payload.insert("id".into(), json!("s1"));
    payload.insert("status".into(), json!("online"));
    client.send_sensor_data(&payload).await.unwrap();
}

// ── Traffic ─────────────────────────────────────────────────────────

#[tokio::test]
async fn set_traffic_state_puts_full_state() {
    let (server, client) = setup(Some("tok")).await;

    Mock::given(method("PUT"))
        .and(path("/v1/traffic-states/layout-1"))
        .and(body_json(json!({
            "layout_id": "layout-1",
            "density": 70.0,
            "speed": "fast",
            "enabled": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client
        .set_traffic_state(&TrafficState {
            layout_id: "layout-1".into(),
            density: 70.0,
            speed: "fast".into(),
            enabled: true,
        })
        .await
        .unwrap();
}

// ── Layouts ─────────────────────────────────────────────────────────

#[tokio::test]
async fn layouts_missing_is_not_found() {
    let (server, client) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/v1/layouts"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such thing"))
        .mount(&server)
        .await;

    let err = client.layouts().await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got {err:?}");
}

#[tokio::test]
async fn set_labels_enabled_posts_flag() {
    let (server, client) = setup(Some("tok")).await;

    Mock::given(method("POST"))
        .and(path("/v1/layouts/layout-1/labels"))
        .and(body_partial_json(json!({ "enabled": false })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.set_labels_enabled("layout-1", false).await.unwrap();
}

// ── Error surface ───────────────────────────────────────────────────

#[tokio::test]
async fn bad_request_carries_platform_message() {
    let (server, client) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/v1/traffic-states"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "density out of range" })),
        )
        .mount(&server)
        .await;

    let err = client.traffic_states().await.unwrap_err();
    assert!(err.is_bad_request());
    assert!(matches!(err, Error::BadRequest { ref message } if message == "density out of range"));
}

#[tokio::test]
async fn long_multibyte_garbage_body_is_a_deserialization_error() {
    let (server, client) = setup(Some("tok")).await;

    // Non-JSON body with a multibyte char straddling the preview cut.
    let body = format!("{}é{}", "x".repeat(199), "y".repeat(50));
    Mock::given(method("GET"))
        .and(path("/v1/sensor-states"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let err = client.sensor_states().await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { .. }),
        "expected deserialization error, got {err:?}"
    );
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    // Point at a port nothing is listening on.
    let urls = ServiceUrls::resolve(
        Environment::Development,
        Some("http://127.0.0.1:9"),
        Some("http://127.0.0.1:9"),
    )
    .unwrap();
    let client = WhooktownClient::new(ClientConfig {
        token: Some("tok".into()),
        urls,
    })
    .unwrap();

    let err = client.sensor_states().await.unwrap_err();
    assert!(err.is_network_error(), "expected network error, got {err:?}");
}
