//! 解析ワークフローの状態遷移
//!
//! idle → analyzing → success / error → (reset) → idle
//! error → analyzing（再送信）
//!
//! 遷移関数は現在の状態を借用して新しい状態を返す。拒否された遷移では
//! 呼び出し側が元の状態をそのまま持ち続ける。

use std::fmt;

use thiserror::Error;

use crate::types::{AnalysisResult, StoreInput};

/// 表示状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStatus {
    Idle,
    Analyzing,
    Success,
    Error,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStatus::Idle => write!(f, "idle"),
            WorkflowStatus::Analyzing => write!(f, "analyzing"),
            WorkflowStatus::Success => write!(f, "success"),
            WorkflowStatus::Error => write!(f, "error"),
        }
    }
}

/// 遷移エラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("店舗の画像を1枚以上追加してください")]
    NoImages,

    #[error("{from} 状態では {action} を実行できません")]
    InvalidTransition {
        from: WorkflowStatus,
        action: &'static str,
    },

    #[error("入力値が不正です: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Stage {
    Idle,
    Analyzing,
    Success(AnalysisResult),
    Error(String),
}

/// 1ユーザー分のセッション状態
///
/// `I` は保留中の画像（ファイルパスや貼り付けデータ）。
#[derive(Debug, Clone, PartialEq)]
pub struct Session<I> {
    input: StoreInput,
    images: Vec<I>,
    stage: Stage,
}

impl<I> Default for Session<I> {
    fn default() -> Self {
        Self {
            input: StoreInput::default(),
            images: Vec::new(),
            stage: Stage::Idle,
        }
    }
}

impl<I: Clone> Session<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> WorkflowStatus {
        match self.stage {
            Stage::Idle => WorkflowStatus::Idle,
            Stage::Analyzing => WorkflowStatus::Analyzing,
            Stage::Success(_) => WorkflowStatus::Success,
            Stage::Error(_) => WorkflowStatus::Error,
        }
    }

    pub fn input(&self) -> &StoreInput {
        &self.input
    }

    pub fn images(&self) -> &[I] {
        &self.images
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.stage {
            Stage::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.stage {
            Stage::Error(message) => Some(message),
            _ => None,
        }
    }

    /// 送信ボタンを有効にできるか
    pub fn can_submit(&self) -> bool {
        self.accepts_submit() && !self.images.is_empty()
    }

    /// 店舗データを差し替え
    pub fn with_input(&self, input: StoreInput) -> Result<Self, WorkflowError> {
        self.ensure_editable("with_input")?;
        input.validate()?;
        Ok(Self {
            input,
            ..self.clone()
        })
    }

    /// 画像を追加（貼り付け）
    pub fn add_images(&self, images: impl IntoIterator<Item = I>) -> Result<Self, WorkflowError> {
        self.ensure_editable("add_images")?;
        let mut next = self.clone();
        next.images.extend(images);
        Ok(next)
    }

    /// 画像を置き換え（ファイル選択）
    pub fn replace_images(&self, images: impl IntoIterator<Item = I>) -> Result<Self, WorkflowError> {
        self.ensure_editable("replace_images")?;
        Ok(Self {
            images: images.into_iter().collect(),
            ..self.clone()
        })
    }

    /// idle / error → analyzing（画像が1枚以上ある場合のみ）
    pub fn submit(&self) -> Result<Self, WorkflowError> {
        if !self.accepts_submit() {
            return Err(self.invalid("submit"));
        }
        if self.images.is_empty() {
            return Err(WorkflowError::NoImages);
        }
        Ok(self.with_stage(Stage::Analyzing))
    }

    /// analyzing → success
    pub fn succeed(&self, result: AnalysisResult) -> Result<Self, WorkflowError> {
        if self.status() != WorkflowStatus::Analyzing {
            return Err(self.invalid("succeed"));
        }
        Ok(self.with_stage(Stage::Success(result)))
    }

    /// analyzing → error
    pub fn fail(&self, message: impl Into<String>) -> Result<Self, WorkflowError> {
        if self.status() != WorkflowStatus::Analyzing {
            return Err(self.invalid("fail"));
        }
        Ok(self.with_stage(Stage::Error(message.into())))
    }

    /// 任意の状態 → idle（入力と画像もクリア）
    pub fn reset(&self) -> Self {
        Self::default()
    }

    fn accepts_submit(&self) -> bool {
        matches!(self.stage, Stage::Idle | Stage::Error(_))
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), WorkflowError> {
        if self.status() == WorkflowStatus::Analyzing {
            return Err(self.invalid(action));
        }
        Ok(())
    }

    fn invalid(&self, action: &'static str) -> WorkflowError {
        WorkflowError::InvalidTransition {
            from: self.status(),
            action,
        }
    }

    fn with_stage(&self, stage: Stage) -> Self {
        Self {
            input: self.input,
            images: self.images.clone(),
            stage,
        }
    }
}
