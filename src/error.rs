use thiserror::Error;

/// リレーが理由を返さなかった場合の表示メッセージ
pub const GENERIC_FAILURE_MESSAGE: &str = "AI解析中にエラーが発生しました";

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("GEMINI_API_KEY is not defined.")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    /// リレーの非2xx応答（メッセージはリレーの文言そのまま）
    #[error("{message}")]
    Relay { status: u16, message: String },

    #[error("リレーに接続できません: {0}")]
    Transport(String),

    #[error("リレー応答のパースに失敗: {0}")]
    ApiParse(String),

    /// 上流プロバイダのエラー（リレーがそのまま返す文言）
    #[error("{0}")]
    Upstream(String),

    #[error("入力エラー: {0}")]
    Interactive(String),

    /// 解析が error 状態で終わった（セッションのメッセージそのまま）
    #[error("{0}")]
    AnalysisFailed(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] autorestaurant_common::Error),

    #[error(transparent)]
    Workflow(#[from] autorestaurant_common::WorkflowError),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
