//! Token client tests against a mocked provider.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use customer_auth_relay::client::TokenClient;
use customer_auth_relay::config::Config;
use customer_auth_relay::error::{ClientError, RelayError};

const CALLBACK: &str = "https://relay.example.com/customer-auth/callback?session=abc";

fn setup_client(mock_server: &MockServer) -> TokenClient {
    TokenClient::new(&Config::for_testing(&mock_server.uri())).unwrap()
}

#[tokio::test]
async fn test_exchange_posts_json_grant() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "grant_type": "authorization_code",
            "code": "code-1",
            "client_id": "test-client",
            "client_secret": "test-secret",
            "redirect_uri": CALLBACK
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok123",
            "id_token": "idt",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = setup_client(&mock_server).exchange_code("code-1", CALLBACK).await.unwrap();
    assert_eq!(token, "tok123");
}

#[tokio::test]
async fn test_exchange_rejected_keeps_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("code already used"))
        .mount(&mock_server)
        .await;

    let err = setup_client(&mock_server).exchange_code("code-1", CALLBACK).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(matches!(&err, ClientError::Rejected { body, .. } if body == "code already used"));
}

#[tokio::test]
async fn test_exchange_rejected_relays_full_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_client"})),
        )
        .mount(&mock_server)
        .await;

    let err = setup_client(&mock_server).exchange_code("code-1", CALLBACK).await.unwrap_err();
    let relay: RelayError = err.into();
    assert_eq!(relay.to_string(), r#"Token exchange failed: {"error":"invalid_client"}"#);
}

#[tokio::test]
async fn test_exchange_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = setup_client(&mock_server).exchange_code("code-1", CALLBACK).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_exchange_non_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&mock_server)
        .await;

    let err = setup_client(&mock_server).exchange_code("code-1", CALLBACK).await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_exchange_empty_access_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": ""})))
        .mount(&mock_server)
        .await;

    let err = setup_client(&mock_server).exchange_code("code-1", CALLBACK).await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_exchange_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "late"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = Config::for_testing(&mock_server.uri());
    config.request_timeout = Duration::from_millis(200);
    let client = TokenClient::new(&config).unwrap();

    let err = client.exchange_code("code-1", CALLBACK).await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));

    let relay: RelayError = err.into();
    assert!(relay.to_string().starts_with("Token exchange failed:"));
}

#[test]
fn test_client_debug_hides_secret() {
    let mut config = Config::for_testing("http://unused.localhost");
    config.client_secret = "super-secret-key".to_string();
    let client = TokenClient::new(&config).unwrap();

    let debug = format!("{client:?}");
    assert!(!debug.contains("super-secret-key"));
    assert!(debug.contains("client_id"));
}

#[tokio::test]
async fn test_rejected_body_read_failure_is_transport_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Error status whose body is cut short: Content-Length promises more than is sent.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.ends_with(b"}") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\nshort")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let client = TokenClient::new(&Config::for_testing(&format!("http://{addr}"))).unwrap();
    let err = client.exchange_code("code-1", CALLBACK).await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));

    let relay: RelayError = err.into();
    assert_ne!(relay.to_string(), "Token exchange failed: ");
}
