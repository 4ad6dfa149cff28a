use crate::error::{AdvisorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const RELAY_URL_ENV: &str = "AUTORESTAURANT_RELAY_URL";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// クライアントが呼び出すリレーのURL
    pub relay_url: String,
    pub timeout_seconds: u64,
    /// リレーが転送するモデル名
    pub model: String,
    /// `{upstream_base_url}/{model}:generateContent` に転送する
    pub upstream_base_url: String,
    /// リレーサーバーの待ち受けアドレス
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            relay_url: "http://127.0.0.1:8787/generate".into(),
            timeout_seconds: 120,
            model: "gemini-1.5-pro-latest".into(),
            upstream_base_url: "https://generativelanguage.googleapis.com/v1/models".into(),
            bind: "127.0.0.1:8787".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（存在しなければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AdvisorError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("autorestaurant").join("config.json"))
    }

    /// リレーURL（環境変数を優先）
    pub fn relay_url(&self) -> String {
        match std::env::var(RELAY_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.relay_url.clone(),
        }
    }

    /// 上流プロバイダのAPIキー（リレー側のみが使用）
    pub fn get_api_key(&self) -> Result<String> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(AdvisorError::MissingApiKey),
        }
    }

    /// 上流の generateContent エンドポイント
    pub fn upstream_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.upstream_base_url.trim_end_matches('/'),
            self.model
        )
    }

    pub fn set_relay_url(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AdvisorError::Config(format!(
                "リレーURLは http:// または https:// で始まる必要があります: {}",
                url
            )));
        }
        self.relay_url = url;
        self.save()
    }
}
