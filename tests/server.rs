//! End-to-end tests over a real listener.

use gemini_proxy::config::{ApiKey, ProxyConfig};
use gemini_proxy::{HttpServer, Shutdown};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

mod common;

async fn start_proxy(config: ProxyConfig, key: Option<&str>) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(config, key.and_then(ApiKey::new)).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_round_trip() {
    let mock = common::start_mock_upstream(200, common::gemini_reply("hi")).await;
    let mut config = ProxyConfig::default();
    config.upstream = mock.config();

    let (addr, shutdown) = start_proxy(config, Some("test-key")).await;

    let res = client()
        .post(format!("http://{}/gemini-proxy", addr))
        .json(&serde_json::json!({ "prompt": "hello" }))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "text": "hi" }));

    shutdown.trigger();
}

#[tokio::test]
async fn test_method_not_allowed_over_http() {
    let mock = common::start_mock_upstream(200, common::gemini_reply("hi")).await;
    let mut config = ProxyConfig::default();
    config.upstream = mock.config();

    let (addr, shutdown) = start_proxy(config, Some("test-key")).await;

    let res = client()
        .get(format!("http://{}/gemini-proxy", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 405);
    assert_eq!(res.text().await.unwrap(), "Method Not Allowed");
    assert!(mock.requests().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_custom_route_path() {
    let mock = common::start_mock_upstream(200, common::gemini_reply("routed")).await;
    let mut config = ProxyConfig::default();
    config.upstream = mock.config();
    config.listener.route_path = "/.netlify/functions/gemini-proxy".into();

    let (addr, shutdown) = start_proxy(config, Some("test-key")).await;

    let res = client()
        .post(format!("http://{}/.netlify/functions/gemini-proxy", addr))
        .body(r#"{"prompt":"hello"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["text"], "routed");

    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_upstream_past_request_timeout_is_json_error() {
    let mock =
        common::start_slow_mock_upstream(Duration::from_secs(3), 200, common::gemini_reply("late"))
            .await;
    let mut config = ProxyConfig::default();
    config.upstream = mock.config();
    config.timeouts.request_secs = 1;

    let (addr, shutdown) = start_proxy(config, Some("test-key")).await;

    let res = client()
        .post(format!("http://{}/gemini-proxy", addr))
        .json(&serde_json::json!({ "prompt": "hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "error": "Gemini API did not respond within 1 seconds." })
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown_stops_listener() {
    let mock = common::start_mock_upstream(200, common::gemini_reply("hi")).await;
    let mut config = ProxyConfig::default();
    config.upstream = mock.config();

    let (addr, shutdown) = start_proxy(config, Some("test-key")).await;

    let res = client()
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let fresh = reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap();
    assert!(fresh.get(format!("http://{}/health", addr)).send().await.is_err());
}
