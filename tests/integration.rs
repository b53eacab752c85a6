use std::sync::Arc;

use axum::http::header::{COOKIE, HOST, SET_COOKIE};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use serde_json::{Value, json};

use shop_chat_server::catalog::{Catalog, Product};
use shop_chat_server::{AppState, ServerConfig, build_router};

const REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");

fn catalog() -> Catalog {
    Catalog::from_products(vec![
        Product::new("Rice", 15000, 10, "food,grain"),
        Product::new("Sugar", 12000, 5, "sweet"),
    ])
    .unwrap()
}

fn server_with(config: ServerConfig) -> TestServer {
    let state: Arc<AppState> = AppState::new(config, catalog()).unwrap();
    TestServer::new(build_router(state)).unwrap()
}

fn demo_server() -> TestServer {
    server_with(ServerConfig::default())
}

async fn chat_from(server: &TestServer, ip: &str, body: Value) -> TestResponse {
    server
        .post("/api/chat")
        .add_header(HOST, HeaderValue::from_static("localhost:8000"))
        .add_header(REAL_IP, HeaderValue::from_str(ip).unwrap())
        .json(&body)
        .await
}

async fn chat(server: &TestServer, message: &str) -> TestResponse {
    chat_from(server, "203.0.113.10", json!({ "message": message })).await
}

#[tokio::test]
async fn health_reports_catalog_size() {
    let server = demo_server();

    let resp = server.get("/api/health").await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    let body: Value = resp.json();
    assert_eq!(body, json!({ "ok": true, "products": 2 }));
}

#[tokio::test]
async fn health_bypasses_admission_guard() {
    let mut config = ServerConfig::default();
    config.admission.rate_limit_max_requests = 1;
    let server = server_with(config);

    chat(&server, "hello").await;
    assert_eq!(chat(&server, "hello").await.status_code(), StatusCode::TOO_MANY_REQUESTS);

    let resp = server
        .get("/api/health")
        .add_header(HOST, HeaderValue::from_static("evil.example.com"))
        .add_header(REAL_IP, HeaderValue::from_static("203.0.113.10"))
        .await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    assert_eq!(resp.json::<Value>()["ok"], true);
}

#[tokio::test]
async fn exact_product_match_is_answered_locally() {
    let server = demo_server();

    let resp = chat(&server, "how much is rice").await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    assert_eq!(
        resp.json::<Value>(),
        json!({ "reply": "Rice is Rp15000 and we have 10 in stock." })
    );
}

#[tokio::test]
async fn demo_mode_reply_without_matches() {
    let server = demo_server();

    let resp = chat(&server, "hello").await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    assert_eq!(
        resp.json::<Value>()["reply"],
        "(demo) You asked: “hello”. Relevant items: no matching items."
    );
}

#[tokio::test]
async fn ranked_shortlist_is_passed_as_context() {
    let server = demo_server();

    // "gra" is part of the "grain" tag but neither a name nor a whole tag
    let resp = chat(&server, "something with gra").await;
    assert_eq!(
        resp.json::<Value>()["reply"],
        "(demo) You asked: “something with gra”. Relevant items: Rice."
    );
}

#[tokio::test]
async fn long_messages_are_truncated() {
    let server = demo_server();

    let resp = chat(&server, &"x".repeat(1500)).await;
    let expected = format!(
        "(demo) You asked: “{}”. Relevant items: no matching items.",
        "x".repeat(1000)
    );
    assert_eq!(resp.json::<Value>()["reply"], Value::String(expected));
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let server = demo_server();

    for body in [json!({ "message": "   " }), json!({})] {
        let resp = chat_from(&server, "203.0.113.10", body).await;
        assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.json::<Value>(), json!({ "error": "Empty message" }));
    }
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let server = demo_server();

    let resp = server
        .post("/api/chat")
        .add_header(HOST, HeaderValue::from_static("localhost"))
        .text("{not json")
        .await;
    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>(), json!({ "error": "Invalid JSON body" }));
}

#[tokio::test]
async fn foreign_host_is_forbidden() {
    let server = demo_server();

    let resp = server
        .post("/api/chat")
        .add_header(HOST, HeaderValue::from_static("shop.example.com"))
        .json(&json!({ "message": "rice" }))
        .await;
    assert_eq!(resp.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(resp.json::<Value>(), json!({ "error": "Forbidden origin" }));
    assert!(resp.headers().get(SET_COOKIE).is_none());
}

#[tokio::test]
async fn thirty_first_request_is_rate_limited() {
    let server = demo_server();

    for i in 0..30 {
        let resp = chat(&server, "rice").await;
        assert_eq!(resp.status_code(), StatusCode::OK, "request {} should pass", i + 1);
    }

    let resp = chat(&server, "rice").await;
    assert_eq!(resp.status_code(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        resp.json::<Value>(),
        json!({ "error": "Too many requests, please wait a bit." })
    );

    // Another client still has its full quota
    let other = chat_from(&server, "198.51.100.20", json!({ "message": "rice" })).await;
    assert_eq!(other.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn spoofed_forwarded_prefix_does_not_reset_quota() {
    let server = demo_server();
    let forwarded_for = HeaderName::from_static("x-forwarded-for");

    let send = |spoofed: String| {
        server
            .post("/api/chat")
            .add_header(HOST, HeaderValue::from_static("localhost"))
            .add_header(
                forwarded_for.clone(),
                HeaderValue::from_str(&format!("{}, 198.51.100.7", spoofed)).unwrap(),
            )
            .json(&json!({ "message": "rice" }))
    };

    for i in 0..30 {
        let resp = send(format!("10.9.{}.{}", i / 250, i % 250)).await;
        assert_eq!(resp.status_code(), StatusCode::OK, "request {} should pass", i + 1);
    }

    let resp = send("10.9.99.99".to_string()).await;
    assert_eq!(resp.status_code(), StatusCode::TOO_MANY_REQUESTS);

    // The proxy's X-Real-IP names the same client, whatever the client prepends
    let resp = server
        .post("/api/chat")
        .add_header(HOST, HeaderValue::from_static("localhost"))
        .add_header(forwarded_for.clone(), HeaderValue::from_static("10.1.2.3"))
        .add_header(REAL_IP, HeaderValue::from_static("198.51.100.7"))
        .json(&json!({ "message": "rice" }))
        .await;
    assert_eq!(resp.status_code(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn session_cookie_is_issued_once() {
    let server = demo_server();

    let first = chat(&server, "rice").await;
    let cookie = first
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("sid="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let sid = cookie
        .trim_start_matches("sid=")
        .split(';')
        .next()
        .unwrap()
        .to_string();
    assert_eq!(sid.len(), 32);

    let again = server
        .post("/api/chat")
        .add_header(HOST, HeaderValue::from_static("localhost"))
        .add_header(COOKIE, HeaderValue::from_str(&format!("sid={}", sid)).unwrap())
        .json(&json!({ "message": "rice" }))
        .await;
    assert_eq!(again.status_code(), StatusCode::OK);
    assert!(again.headers().get(SET_COOKIE).is_none());
    assert_eq!(
        again.json::<Value>()["reply"],
        "Rice is Rp15000 and we have 10 in stock."
    );
}

#[tokio::test]
async fn upstream_failure_becomes_apology() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = ServerConfig::default();
    config.completion.api_key = Some("test-key".to_string());
    config.completion.api_base = format!("http://{}", addr);
    let server = server_with(config);

    let resp = chat(&server, "what are your opening hours?").await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    let reply = resp.json::<Value>()["reply"].as_str().unwrap().to_string();
    assert!(reply.starts_with("Sorry"), "unexpected reply: {}", reply);
    assert!(resp.headers().get(SET_COOKIE).is_some());
}
