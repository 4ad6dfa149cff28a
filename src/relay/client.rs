use crate::config::Config;
use crate::error::{AdvisorError, Result, GENERIC_FAILURE_MESSAGE};
use autorestaurant_common::{parse_result_payload, RelayErrorBody, RelayRequest, RelayResponse};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// リレー呼び出しクライアント（再試行なし、1リクエスト1レスポンス）
#[derive(Debug, Clone)]
pub struct RelayClient {
    url: String,
    client: Client,
}

impl RelayClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdvisorError::Config(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.relay_url(), Duration::from_secs(config.timeout_seconds))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// リレーを呼び出し、`result` をJSONとして返す
    ///
    /// 接続失敗・非2xx・エンベロープ不正・`result` 不正はすべてエラー。
    /// 非2xxではリレーの `message` を、なければ汎用メッセージを使う。
    pub async fn generate(&self, request: &RelayRequest) -> Result<Value> {
        tracing::debug!(
            url = %self.url,
            prompt_len = request.prompt.len(),
            images = request.images.len(),
            temperature = ?request.config.temperature,
            "リレー呼び出し"
        );

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("リレー接続エラー: {}", e);
                AdvisorError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AdvisorError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<RelayErrorBody>(&body)
                .ok()
                .map(|b| b.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            tracing::error!(status = status.as_u16(), "リレーエラー: {}", message);
            return Err(AdvisorError::Relay {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: RelayResponse = serde_json::from_str(&body).map_err(|e| {
            AdvisorError::ApiParse(format!("レスポンス形式が不正です: {}", e))
        })?;

        if envelope.result.trim().is_empty() {
            return Err(AdvisorError::ApiParse("Function returned an empty result.".into()));
        }

        tracing::debug!(result_len = envelope.result.len(), "リレー応答");

        parse_result_payload(&envelope.result).map_err(|e| AdvisorError::ApiParse(e.to_string()))
    }
}
