//! 上流プロバイダ（Gemini generateContent）連携
//!
//! リレーリクエストを1つの user コンテンツに詰め替える:
//! `[システム指示, プロンプト, ...インライン画像]`

use crate::error::{AdvisorError, Result};
use autorestaurant_common::relay::JSON_MIME_TYPE;
use autorestaurant_common::RelayRequest;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_TEMPERATURE: f32 = 0.4;
const API_KEY_HEADER: &str = "x-goog-api-key";
const UPSTREAM_FAILURE_MESSAGE: &str = "Google API request failed";
const NO_TEXT_MESSAGE: &str = "No response text generated.";

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: String,
}

/// Gemini APIレスポンス
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GeminiResponse {
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiError {
    message: Option<String>,
}

impl GeminiRequest {
    pub(crate) fn from_relay(request: &RelayRequest) -> Self {
        let mut parts = vec![
            Part::Text {
                text: request.config.system_instruction.clone(),
            },
            Part::Text {
                text: request.prompt.clone(),
            },
        ];

        parts.extend(request.images.iter().map(|img| Part::InlineData {
            inline_data: InlineData {
                mime_type: img.mime_type().to_string(),
                data: img.data().to_string(),
            },
        }));

        Self {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: request.config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
                response_mime_type: JSON_MIME_TYPE.to_string(),
            },
        }
    }
}

impl GeminiResponse {
    /// 最初の候補の最初のテキストパート
    pub(crate) fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| p.text.as_deref())
            .filter(|t| !t.is_empty())
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.message.as_deref())
    }
}

/// 通信エラーからURLを除いて上流エラーにする
fn transport_error(e: reqwest::Error) -> AdvisorError {
    let e = e.without_url();
    tracing::error!("Gemini API request failed: {}", e);
    AdvisorError::Upstream(e.to_string())
}

/// 上流 generateContent を呼び出し、生成テキストを返す
///
/// APIキーはヘッダーで渡す。URLに含めるとエラー文やログに残るため。
pub async fn generate_content(
    client: &Client,
    upstream_url: &str,
    api_key: &str,
    request: &RelayRequest,
) -> Result<String> {
    let body = GeminiRequest::from_relay(request);

    let response = client
        .post(upstream_url)
        .header(API_KEY_HEADER, api_key)
        .json(&body)
        .send()
        .await
        .map_err(transport_error)?;

    let status = response.status();
    let text = response.text().await.map_err(transport_error)?;
    let parsed = serde_json::from_str::<GeminiResponse>(&text);

    if !status.is_success() {
        let message = parsed
            .ok()
            .and_then(|r| r.error_message().map(str::to_string))
            .unwrap_or_else(|| UPSTREAM_FAILURE_MESSAGE.to_string());
        tracing::error!(status = status.as_u16(), "Google API ERROR: {}", message);
        return Err(AdvisorError::Upstream(message));
    }

    let parsed = parsed.map_err(|e| {
        tracing::error!("Failed to parse Gemini response: {}", e);
        AdvisorError::Upstream(format!("Failed to parse Gemini response: {}", e))
    })?;

    parsed
        .first_text()
        .map(str::to_string)
        .ok_or_else(|| AdvisorError::Upstream(NO_TEXT_MESSAGE.to_string()))
}
