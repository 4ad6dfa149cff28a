//! リレーAPIのワイヤ型
//!
//! クライアントとリレーサーバーで共有する:
//! - RelayRequest: `{prompt, images, config}`
//! - RelayResponse: 成功時 `{result}`
//! - RelayErrorBody: 失敗時 `{message}`

use serde::{Deserialize, Serialize};

use crate::prompts::AnalysisStage;
use crate::types::EncodedImage;

pub const JSON_MIME_TYPE: &str = "application/json";

/// 生成パラメータ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default)]
    pub system_instruction: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default = "default_response_mime_type")]
    pub response_mime_type: String,
}

fn default_response_mime_type() -> String {
    JSON_MIME_TYPE.to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            system_instruction: String::new(),
            temperature: None,
            response_mime_type: default_response_mime_type(),
        }
    }
}

impl GenerationConfig {
    /// ステージ固定のシステム指示と温度で設定を作る
    pub fn for_stage(stage: AnalysisStage) -> Self {
        Self {
            system_instruction: stage.system_instruction(),
            temperature: Some(stage.temperature()),
            response_mime_type: default_response_mime_type(),
        }
    }
}

/// リレーへのリクエスト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub images: Vec<EncodedImage>,
    #[serde(default)]
    pub config: GenerationConfig,
}

impl RelayRequest {
    pub fn new(stage: AnalysisStage, prompt: String, images: Vec<EncodedImage>) -> Self {
        Self {
            prompt,
            images,
            config: GenerationConfig::for_stage(stage),
        }
    }
}

/// リレー成功レスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub result: String,
}

/// リレー失敗レスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayErrorBody {
    pub message: String,
}
