use crate::config::Config;
use crate::error::{AdvisorError, Result};
use crate::relay::gemini::generate_content;
use autorestaurant_common::{RelayErrorBody, RelayRequest, RelayResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// リレーサーバーの共有状態（リクエスト間で不変）
#[derive(Clone)]
pub struct RelayState {
    client: Client,
    upstream_url: String,
    api_key: Option<String>,
}

impl RelayState {
    pub fn new(upstream_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdvisorError::Config(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self {
            client,
            upstream_url: upstream_url.into(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = match config.get_api_key() {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::warn!("{} リクエストはすべて失敗します", e);
                None
            }
        };
        Self::new(
            config.upstream_url(),
            api_key,
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

impl fmt::Debug for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayState")
            .field("upstream_url", &self.upstream_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .route("/.netlify/functions/generate", post(generate))
        .with_state(Arc::new(state))
}

/// 設定のアドレスで待ち受け
pub async fn serve(config: &Config) -> Result<()> {
    let state = RelayState::from_config(config)?;
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(bind = %config.bind, upstream = %config.upstream_url(), "リレーサーバー起動");
    println!("✔ リレーサーバー起動: http://{}/generate", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn generate(State(state): State<Arc<RelayState>>, body: String) -> Response {
    match forward(&state, &body).await {
        Ok(result) => (StatusCode::OK, Json(RelayResponse { result })).into_response(),
        Err(e) => {
            tracing::error!("Function Error: {}", e);
            let body = RelayErrorBody {
                message: e.to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

async fn forward(state: &RelayState, body: &str) -> Result<String> {
    let request: RelayRequest = if body.trim().is_empty() {
        serde_json::from_str("{}")?
    } else {
        serde_json::from_str(body)?
    };

    let api_key = state.api_key.as_deref().ok_or(AdvisorError::MissingApiKey)?;

    tracing::debug!(
        prompt_len = request.prompt.len(),
        images = request.images.len(),
        "上流へ転送"
    );

    generate_content(&state.client, &state.upstream_url, api_key, &request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let state = RelayState::new(
            "http://localhost/upstream",
            Some("SUPERSECRETKEY".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();

        let text = format!("{:?}", state);
        assert!(!text.contains("SUPERSECRETKEY"));
        assert!(text.contains("***"));
        assert!(text.contains("http://localhost/upstream"));

        let without_key = RelayState::new("http://localhost/upstream", None, Duration::from_secs(1)).unwrap();
        assert!(format!("{:?}", without_key).contains("None"));
    }
}
