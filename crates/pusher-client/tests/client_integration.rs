//! # End-to-end tests for the Pusher client
//!
//! Drives `PusherClient` through a recording transport and checks that
//! validation happens before any network call, that requests are signed
//! correctly, and that auth and webhook flows agree with the signing
//! primitives.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pusher_client::ports::FixedTimeSource;
use pusher_client::{
    sign, HttpMethod, HttpRequest, HttpResponse, HttpTransport, PusherClient, PusherConfig,
    PusherError, TransportError, ValidationError,
};
use serde_json::{json, Value};

// =============================================================================
// TEST HELPERS
// =============================================================================

const NOW_MS: u64 = 1_700_000_000_000;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Records every request and answers with a canned response.
struct RecordingTransport {
    response: Result<HttpResponse, String>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    fn ok(body: &str) -> Arc<Self> {
        Self::with_status(200, body)
    }

    fn with_status(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            response: Err("connection refused".to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.response
            .clone()
            .map_err(TransportError::Connection)
    }
}

fn config() -> PusherConfig {
    PusherConfig::new("42", "app-key", "app-secret").with_cluster("eu")
}

fn client_with(transport: Arc<RecordingTransport>) -> PusherClient {
    init_tracing();
    PusherClient::with_transport(config(), transport, Arc::new(FixedTimeSource(NOW_MS)))
}

fn param<'a>(request: &'a HttpRequest, key: &str) -> Option<&'a str> {
    request
        .query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Recompute the REST signature from the request as sent.
fn expected_signature(request: &HttpRequest, path: &str) -> String {
    let query = request
        .query
        .iter()
        .filter(|(k, _)| k != "auth_signature")
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    sign("app-secret", &format!("{}\n{}\n{}", request.method, path, query))
}

// =============================================================================
// VALIDATION BEFORE NETWORK
// =============================================================================

#[tokio::test]
async fn trigger_with_101_channels_never_reaches_transport() {
    let transport = RecordingTransport::ok("{}");
    let client = client_with(transport.clone());

    let channels: Vec<String> = (0..101).map(|i| format!("channel-{i}")).collect();
    let err = client
        .trigger(&channels, "my-event", &json!({}), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PusherError::Validation(ValidationError::TooManyChannels { count: 101, max: 100 })
    ));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn channel_with_space_is_rejected_everywhere() {
    let transport = RecordingTransport::ok("{}");
    let client = client_with(transport.clone());

    let trigger = client.trigger(&["a b"], "e", &json!({}), None).await;
    let info = client.channel_info("a b", &["user_count"]).await;
    let users = client.users_info("a b").await;

    for result in [trigger, info, users] {
        assert!(matches!(
            result,
            Err(PusherError::Validation(ValidationError::InvalidChannelName(ref c))) if c == "a b"
        ));
    }
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn oversized_payload_rejected() {
    let transport = RecordingTransport::ok("{}");
    let client = client_with(transport.clone());

    let data = json!("z".repeat(10 * 1024 + 1));
    let err = client.trigger(&["c"], "e", &data, None).await.unwrap_err();

    assert!(matches!(
        err,
        PusherError::Validation(ValidationError::PayloadTooLarge { size: 10241, .. })
    ));
    assert!(transport.requests().is_empty());
}

// =============================================================================
// REQUEST ASSEMBLY
// =============================================================================

#[tokio::test]
async fn trigger_request_is_signed() {
    let transport = RecordingTransport::ok("{}");
    let client = client_with(transport.clone());

    let response = client
        .trigger(
            &["private-a", "presence-b"],
            "update",
            &json!({"count": 3}),
            Some("123.456"),
        )
        .await
        .unwrap();
    assert!(response.is_empty());

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "https://api-eu.pusher.com:443/apps/42/events");
    assert_eq!(param(request, "auth_key"), Some("app-key"));
    assert_eq!(param(request, "auth_timestamp"), Some("1700000000"));
    assert_eq!(param(request, "auth_version"), Some("1.0"));
    assert_eq!(
        param(request, "body_md5"),
        Some(format!("{:x}", md5::compute(request.body.as_ref().unwrap())).as_str())
    );
    assert_eq!(
        param(request, "auth_signature"),
        Some(expected_signature(request, "/apps/42/events").as_str())
    );

    let body: Value = serde_json::from_str(request.body.as_ref().unwrap()).unwrap();
    assert_eq!(body["name"], "update");
    assert_eq!(body["channels"], json!(["private-a", "presence-b"]));
    assert_eq!(body["data"], r#"{"count":3}"#);
    assert_eq!(body["socket_id"], "123.456");
}

#[tokio::test]
async fn channels_info_query() {
    let transport = RecordingTransport::ok(r#"{"channels":{"presence-room":{"user_count":2}}}"#);
    let client = client_with(transport.clone());

    let response = client
        .channels_info(Some("presence-"), &["user_count"])
        .await
        .unwrap();
    assert_eq!(response["channels"]["presence-room"]["user_count"], 2);

    let request = &transport.requests()[0];
    assert_eq!(request.method, HttpMethod::Get);
    assert!(request.body.is_none());
    assert!(param(request, "body_md5").is_none());
    assert_eq!(param(request, "filter_by_prefix"), Some("presence-"));
    assert_eq!(param(request, "info"), Some("user_count"));
    assert_eq!(
        param(request, "auth_signature"),
        Some(expected_signature(request, "/apps/42/channels").as_str())
    );
}

#[tokio::test]
async fn channel_info_and_users() {
    let transport = RecordingTransport::ok(r#"{"occupied":true}"#);
    let client = client_with(transport.clone());

    let info = client
        .channel_info("presence-room", &["user_count", "subscription_count"])
        .await
        .unwrap();
    assert_eq!(info["occupied"], true);
    client.users_info("presence-room").await.unwrap();

    let requests = transport.requests();
    assert!(requests[0].url.ends_with("/apps/42/channels/presence-room"));
    assert_eq!(
        param(&requests[0], "info"),
        Some("user_count,subscription_count")
    );
    assert!(requests[1].url.ends_with("/apps/42/channels/presence-room/users"));
}

// =============================================================================
// ERROR PROPAGATION
// =============================================================================

#[tokio::test]
async fn http_status_errors_are_typed() {
    for (status, check) in [
        (400u16, "bad request"),
        (401, "unauthorized"),
        (403, "forbidden"),
        (500, "unexpected status 500"),
    ] {
        let client = client_with(RecordingTransport::with_status(status, "boom"));
        let err = client.users_info("presence-room").await.unwrap_err();
        assert!(err.to_string().contains(check), "{status}: {err}");
    }
}

#[tokio::test]
async fn transport_failure_propagates() {
    let client = client_with(RecordingTransport::unreachable());
    let err = client.users_info("presence-room").await.unwrap_err();
    assert!(matches!(err, PusherError::Transport(TransportError::Connection(_))));
}

// =============================================================================
// AUTH AND WEBHOOKS
// =============================================================================

#[test]
fn authenticate_presence_without_custom_data() {
    let client = client_with(RecordingTransport::ok("{}"));
    let out: Value =
        serde_json::from_str(&client.authenticate("presence-x", "123.456", None)).unwrap();

    let signature = sign("app-secret", "123.456:presence-x");
    assert_eq!(out, json!({ "auth": format!("app-key:{signature}") }));
}

#[test]
fn authenticate_custom_data_round_trips_through_signature() {
    let client = client_with(RecordingTransport::ok("{}"));
    let member = json!({"user_id": "u1"});
    let out: Value = serde_json::from_str(&client.authenticate(
        "presence-x",
        "123.456",
        Some(&member),
    ))
    .unwrap();

    let channel_data = out["channel_data"].as_str().unwrap();
    let signature = out["auth"].as_str().unwrap().strip_prefix("app-key:").unwrap();
    assert!(pusher_client::verify(
        "app-secret",
        &format!("123.456:presence-x:{channel_data}"),
        signature
    ));
}

#[test]
fn webhook_accept_and_reject() {
    let client = client_with(RecordingTransport::ok("{}"));
    let body = json!({"time_ms": NOW_MS - 5_000, "events": [{"name": "member_added"}]}).to_string();
    let signature = sign("app-secret", &body);

    let parsed = client.validate_webhook("app-key", &signature, &body).unwrap();
    assert_eq!(parsed["events"][0]["name"], "member_added");

    assert!(client.validate_webhook("other-key", &signature, &body).is_none());
    assert!(client.validate_webhook("app-key", "deadbeef", &body).is_none());

    let stale = json!({"time_ms": NOW_MS - 600_000, "events": []}).to_string();
    assert!(client
        .validate_webhook("app-key", &sign("app-secret", &stale), &stale)
        .is_none());
}
