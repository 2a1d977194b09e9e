#![allow(clippy::unwrap_used)]
// Integration tests for `GatewayClient` using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Map, Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use meon_api::{
    Credentials, Endpoint, Error, GatewayClient, HttpMethod, INFO_PATH, LOGIN_PATH, Payload,
    build_request,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GatewayClient) {
    let server = MockServer::start().await;
    let client = GatewayClient::with_client(reqwest::Client::new());
    (server, client)
}

fn credentials() -> Credentials {
    Credentials::new("admin", SecretString::from("secret".to_owned()))
}

fn id_body(id: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("id".into(), json!(id));
    map
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_info_sends_basic_auth_and_id_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/info"))
        .and(query_param("id", "loja1"))
        .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "connected": true })))
        .expect(1)
        .mount(&server)
        .await;

    let req = build_request(
        &server.uri(),
        "loja1",
        Endpoint::new(INFO_PATH, HttpMethod::Get),
        None,
        &credentials(),
    )
    .unwrap();

    let payload = client.send(req).await.unwrap();
    assert_eq!(payload, Payload::Json(json!({ "connected": true })));
}

#[tokio::test]
async fn test_login_posts_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "id": "loja1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "qr": "data:image/png;base64,AAA" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let body = id_body("loja1");
    let base = format!("{}/", server.uri());
    let req = build_request(
        &base,
        "loja1",
        Endpoint::new(LOGIN_PATH, HttpMethod::Post),
        Some(&body),
        &credentials(),
    )
    .unwrap();

    let payload = client.send(req).await.unwrap();
    assert_eq!(payload.str_field("qr"), Some("data:image/png;base64,AAA"));
}

#[tokio::test]
async fn test_plain_text_success_is_text_payload() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_string("bye"))
        .mount(&server)
        .await;

    let body = id_body("loja1");
    let req = build_request(
        &server.uri(),
        "loja1",
        Endpoint::new("/logout", HttpMethod::Post),
        Some(&body),
        &credentials(),
    )
    .unwrap();

    assert_eq!(client.send(req).await.unwrap(), Payload::Text("bye".into()));
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_http_error_uses_json_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "invalid credentials" })),
        )
        .mount(&server)
        .await;

    let body = id_body("loja1");
    let req = build_request(
        &server.uri(),
        "loja1",
        Endpoint::new(LOGIN_PATH, HttpMethod::Post),
        Some(&body),
        &credentials(),
    )
    .unwrap();

    let err = client.send(req).await.unwrap_err();
    assert!(err.is_auth_failure());
    match err {
        Error::Http { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid credentials");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Nothing listens on port 1.
    let client = GatewayClient::with_client(reqwest::Client::new());

    let req = build_request(
        "http://127.0.0.1:1",
        "",
        Endpoint::new(INFO_PATH, HttpMethod::Get),
        None,
        &credentials(),
    )
    .unwrap();

    let err = client.send(req).await.unwrap_err();
    match err {
        Error::Transport(ref e) => assert!(e.is_connect(), "expected connect error: {e:?}"),
        ref other => panic!("expected Transport error, got: {other:?}"),
    }
    let message = err.to_string();
    assert!(message.starts_with("error sending request"), "{message}");
    assert!(
        message.to_lowercase().contains("connection refused"),
        "cause missing from: {message}"
    );
}

#[tokio::test]
async fn test_timeout_names_the_cause() {
    let (server, _) = setup().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let client = GatewayClient::with_client(http);
    let req = build_request(
        &server.uri(),
        "loja1",
        Endpoint::new(INFO_PATH, HttpMethod::Get),
        None,
        &credentials(),
    )
    .unwrap();

    let err = client.send(req).await.unwrap_err();
    assert!(matches!(err, Error::Transport(ref e) if e.is_timeout()), "{err:?}");
    assert!(err.to_string().contains("timed out"), "{err}");
}
