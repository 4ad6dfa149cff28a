//! リレーサーバーのテスト
//!
//! 上流プロバイダもaxumのモックで代替し、転送内容と応答の変換を検証する。

use autorestaurant_advisor::relay::{router, RelayClient, RelayState};
use autorestaurant_common::{AnalysisStage, EncodedImage, RelayRequest};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 上流が受け取ったリクエスト（APIキー, 本文）
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<(Option<String>, Value)>>>);

impl Captured {
    fn take(&self) -> Vec<(Option<String>, Value)> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_upstream(status: StatusCode, reply: Value, captured: Captured) -> String {
    let app = Router::new().route(
        "/upstream",
        post(
            move |headers: HeaderMap, Json(body): Json<Value>| {
                let captured = captured.clone();
                let reply = reply.clone();
                let key = headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                async move {
                    captured.0.lock().unwrap().push((key, body));
                    (status, Json(reply))
                }
            },
        ),
    );
    format!("{}/upstream", spawn(app).await)
}

async fn spawn_relay(upstream_url: String, api_key: Option<&str>) -> String {
    let state = RelayState::new(
        upstream_url,
        api_key.map(str::to_string),
        Duration::from_secs(5),
    )
    .unwrap();
    spawn(router(state)).await
}

fn planning_request() -> RelayRequest {
    RelayRequest::new(
        AnalysisStage::Planning,
        "plan this store".to_string(),
        vec![
            EncodedImage::new("image/jpeg", "/9j/4AAQ"),
            EncodedImage::new("image/png", "iVBORw0KGgo="),
        ],
    )
}

fn candidate(text: &str) -> Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
}

async fn post_json(url: &str, body: &RelayRequest) -> (u16, Value) {
    let response = reqwest::Client::new().post(url).json(body).send().await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_forwards_to_upstream() {
    let captured = Captured::default();
    let upstream = spawn_upstream(StatusCode::OK, candidate("{\"ok\":true}"), captured.clone()).await;
    let relay = spawn_relay(upstream, Some("test-key")).await;

    let request = planning_request();
    let (status, body) = post_json(&format!("{}/generate", relay), &request).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"result": "{\"ok\":true}"}));

    let calls = captured.take();
    assert_eq!(calls.len(), 1);
    let (key, sent) = &calls[0];
    assert_eq!(key.as_deref(), Some("test-key"));

    let contents = sent["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0]["role"], json!("user"));

    let parts = contents[0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 4);
    assert_eq!(parts[0]["text"], json!(request.config.system_instruction));
    assert_eq!(parts[1]["text"], json!("plan this store"));
    assert_eq!(
        parts[2]["inlineData"],
        json!({"mimeType": "image/jpeg", "data": "/9j/4AAQ"})
    );
    assert_eq!(parts[3]["inlineData"]["mimeType"], json!("image/png"));

    assert_eq!(sent["generationConfig"]["temperature"], json!(0.5));
    assert_eq!(
        sent["generationConfig"]["responseMimeType"],
        json!("application/json")
    );
}

#[tokio::test]
async fn test_netlify_path() {
    let captured = Captured::default();
    let upstream = spawn_upstream(StatusCode::OK, candidate("{}"), captured.clone()).await;
    let relay = spawn_relay(upstream, Some("test-key")).await;

    let (status, _) = post_json(
        &format!("{}/.netlify/functions/generate", relay),
        &planning_request(),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(captured.take().len(), 1);
}

#[tokio::test]
async fn test_default_temperature() {
    let captured = Captured::default();
    let upstream = spawn_upstream(StatusCode::OK, candidate("{}"), captured.clone()).await;
    let relay = spawn_relay(upstream, Some("test-key")).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", relay))
        .body(r#"{"prompt": "hello"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let calls = captured.take();
    assert_eq!(calls[0].1["generationConfig"]["temperature"], json!(0.4));
    assert_eq!(calls[0].1["contents"][0]["parts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_upstream_error_message() {
    let captured = Captured::default();
    let upstream = spawn_upstream(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"code": 429, "message": "Resource has been exhausted"}}),
        captured,
    )
    .await;
    let relay = spawn_relay(upstream, Some("test-key")).await;

    let (status, body) = post_json(&format!("{}/generate", relay), &planning_request()).await;

    assert_eq!(status, 500);
    assert_eq!(body, json!({"message": "Resource has been exhausted"}));
}

#[tokio::test]
async fn test_upstream_error_without_message() {
    let app = Router::new().route(
        "/upstream",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "unavailable") }),
    );
    let upstream = format!("{}/upstream", spawn(app).await);
    let relay = spawn_relay(upstream, Some("test-key")).await;

    let (status, body) = post_json(&format!("{}/generate", relay), &planning_request()).await;

    assert_eq!(status, 500);
    assert_eq!(body["message"], json!("Google API request failed"));
}

#[tokio::test]
async fn test_upstream_without_text() {
    let captured = Captured::default();
    let upstream = spawn_upstream(StatusCode::OK, json!({"candidates": []}), captured).await;
    let relay = spawn_relay(upstream, Some("test-key")).await;

    let (status, body) = post_json(&format!("{}/generate", relay), &planning_request()).await;

    assert_eq!(status, 500);
    assert_eq!(body["message"], json!("No response text generated."));
}

/// 上流に接続できない場合もAPIキーは応答に含めない
#[tokio::test]
async fn test_unreachable_upstream_hides_key() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let relay = spawn_relay(format!("http://{}/upstream", addr), Some("SUPERSECRETKEY")).await;
    let response = reqwest::Client::new()
        .post(format!("{}/generate", relay))
        .json(&planning_request())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    let text = response.text().await.unwrap();
    assert!(!text.contains("SUPERSECRETKEY"));
    let body: Value = serde_json::from_str(&text).unwrap();
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_api_key() {
    let captured = Captured::default();
    let upstream = spawn_upstream(StatusCode::OK, candidate("{}"), captured.clone()).await;
    let relay = spawn_relay(upstream, None).await;

    let (status, body) = post_json(&format!("{}/generate", relay), &planning_request()).await;

    assert_eq!(status, 500);
    assert_eq!(body["message"], json!("GEMINI_API_KEY is not defined."));
    assert!(captured.take().is_empty());
}

#[tokio::test]
async fn test_invalid_body() {
    let captured = Captured::default();
    let upstream = spawn_upstream(StatusCode::OK, candidate("{}"), captured.clone()).await;
    let relay = spawn_relay(upstream, Some("test-key")).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", relay))
        .body("{broken")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(!body["message"].as_str().unwrap().is_empty());
    assert!(captured.take().is_empty());
}

/// クライアント → リレー → 上流 の往復
#[tokio::test]
async fn test_client_through_relay() {
    let captured = Captured::default();
    let upstream = spawn_upstream(
        StatusCode::OK,
        candidate("```json\n{\"current_cost\": {\"monthly_labor_cost\": 500}}\n```"),
        captured,
    )
    .await;
    let relay = spawn_relay(upstream, Some("test-key")).await;

    let client = RelayClient::new(format!("{}/generate", relay), Duration::from_secs(5)).unwrap();
    let value = client.generate(&planning_request()).await.unwrap();

    assert_eq!(value, json!({"current_cost": {"monthly_labor_cost": 500}}));
}

/// 上流のエラー文言がクライアントまでそのまま届く
#[tokio::test]
async fn test_client_receives_upstream_message() {
    let captured = Captured::default();
    let upstream = spawn_upstream(
        StatusCode::FORBIDDEN,
        json!({"error": {"message": "API key not valid."}}),
        captured,
    )
    .await;
    let relay = spawn_relay(upstream, Some("bad-key")).await;

    let client = RelayClient::new(format!("{}/generate", relay), Duration::from_secs(5)).unwrap();
    let err = client.generate(&planning_request()).await.unwrap_err();

    assert_eq!(err.to_string(), "API key not valid.");
}
