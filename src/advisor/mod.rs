//! 解析セッションの制御
//!
//! `Session` の状態遷移を進めながら、エンコード → Step1 → 確定 → Step2 → 照合
//! を順に実行する。送信中は `&mut self` を借用するため二重送信はできない。

pub mod stages;

pub use stages::{analyze_environment, generate_automation_plan, Plan};

use crate::encoder::encode_all;
use crate::error::{AdvisorError, Result, GENERIC_FAILURE_MESSAGE};
use crate::relay::RelayClient;
use crate::scanner::{collect_images, images_from_clipboard, ClipboardItem, ImageSource};
use autorestaurant_common::{
    AnalysisResult, ConfirmedStoreData, EnvironmentAnalysis, LaborOverride, Session, StoreInput,
    WorkflowStatus,
};
use std::path::PathBuf;

pub struct Advisor {
    relay: RelayClient,
    session: Session<ImageSource>,
    environment: Option<EnvironmentAnalysis>,
    confirmed: Option<ConfirmedStoreData>,
    overrides: Vec<LaborOverride>,
}

impl Advisor {
    pub fn new(relay: RelayClient) -> Self {
        Self {
            relay,
            session: Session::new(),
            environment: None,
            confirmed: None,
            overrides: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session<ImageSource> {
        &self.session
    }

    pub fn status(&self) -> WorkflowStatus {
        self.session.status()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.session.result()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.session.error_message()
    }

    /// 解析結果、または失敗メッセージを持つエラー
    pub fn outcome(&self) -> Result<&AnalysisResult> {
        match self.session.result() {
            Some(result) if self.status() == WorkflowStatus::Success => Ok(result),
            _ => Err(AdvisorError::AnalysisFailed(
                self.error_message().unwrap_or(GENERIC_FAILURE_MESSAGE).to_string(),
            )),
        }
    }

    /// 直近のStep1結果
    pub fn environment(&self) -> Option<&EnvironmentAnalysis> {
        self.environment.as_ref()
    }

    /// 直近のStep2に渡した確定データ
    pub fn confirmed(&self) -> Option<&ConfirmedStoreData> {
        self.confirmed.as_ref()
    }

    /// 直近の照合で上書きした項目
    pub fn overrides(&self) -> &[LaborOverride] {
        &self.overrides
    }

    pub fn set_input(&mut self, input: StoreInput) -> Result<()> {
        self.session = self.session.with_input(input)?;
        Ok(())
    }

    /// ファイル選択（既存の保留画像を置き換える）
    pub fn select_files(&mut self, paths: &[PathBuf]) -> Result<usize> {
        let sources = collect_images(paths)?;
        let count = sources.len();
        self.session = self.session.replace_images(sources)?;
        Ok(count)
    }

    /// 貼り付け（画像項目のみ追加）
    pub fn paste(&mut self, items: Vec<ClipboardItem>) -> Result<usize> {
        let pasted = images_from_clipboard(items);
        let count = pasted.len();
        if count > 0 {
            self.session = self.session.add_images(pasted)?;
        }
        Ok(count)
    }

    /// 入力・画像・結果をすべて破棄して idle に戻す
    pub fn reset(&mut self) {
        self.session = self.session.reset();
        self.environment = None;
        self.confirmed = None;
        self.overrides.clear();
    }

    /// 解析を実行
    ///
    /// 画像がない場合は状態を変えずに検証エラーを返す。それ以外の失敗は
    /// error 状態に遷移し、`Ok(WorkflowStatus::Error)` を返す。
    /// `confirm` はStep1結果を確定データに変換する（編集UIなど）。
    pub async fn submit<F>(&mut self, confirm: F) -> Result<WorkflowStatus>
    where
        F: FnOnce(&StoreInput, EnvironmentAnalysis) -> Result<ConfirmedStoreData>,
    {
        self.session = self.session.submit()?;
        self.environment = None;
        self.confirmed = None;
        self.overrides.clear();

        self.session = match self.run(confirm).await {
            Ok(result) => self.session.succeed(result)?,
            Err(e) => {
                tracing::warn!("解析失敗: {}", e);
                self.session.fail(e.to_string())?
            }
        };

        Ok(self.session.status())
    }

    async fn run<F>(&mut self, confirm: F) -> Result<AnalysisResult>
    where
        F: FnOnce(&StoreInput, EnvironmentAnalysis) -> Result<ConfirmedStoreData>,
    {
        let input = *self.session.input();
        let images = encode_all(self.session.images()).await?;

        let environment = analyze_environment(&self.relay, &images).await?;
        self.environment = Some(environment.clone());

        // 人件費などの入力値は常にセッションの値を使う
        let confirmed = ConfirmedStoreData {
            input,
            ..confirm(&input, environment)?
        };
        self.confirmed = Some(confirmed.clone());

        let plan = generate_automation_plan(&self.relay, &confirmed, &images).await?;
        self.overrides = plan.overrides;
        Ok(plan.result)
    }
}

/// Step1の推定値をそのまま確定する
pub fn accept_environment(input: &StoreInput, environment: EnvironmentAnalysis) -> Result<ConfirmedStoreData> {
    Ok(ConfirmedStoreData::from_analysis(*input, &environment))
}
