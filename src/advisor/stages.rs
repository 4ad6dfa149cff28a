//! 2段階解析の各ステージ
//!
//! - Step1: 画像のみから店舗環境を推定
//! - Step2: 確定データ + 画像から自動化計画・ROIを生成し、人件費を照合

use crate::error::Result;
use crate::relay::RelayClient;
use autorestaurant_common::{
    build_environment_prompt, build_planning_prompt, labor_overrides, parse_analysis,
    parse_environment, reconcile, AnalysisResult, AnalysisStage, ConfirmedStoreData,
    EncodedImage, EnvironmentAnalysis, LaborOverride, RelayRequest,
};

/// Step2の結果（照合済み）と、上書きした項目
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub result: AnalysisResult,
    pub overrides: Vec<LaborOverride>,
}

/// Step1: 環境分析
pub async fn analyze_environment(
    relay: &RelayClient,
    images: &[EncodedImage],
) -> Result<EnvironmentAnalysis> {
    let stage = AnalysisStage::Environment;
    let prompt = build_environment_prompt(images.len());
    tracing::debug!(stage = stage.label(), prompt_len = prompt.len(), "プロンプト生成");

    let request = RelayRequest::new(stage, prompt, images.to_vec());
    let value = relay.generate(&request).await?;

    Ok(parse_environment(value)?)
}

/// Step2: 自動化計画 + ROI（人件費はユーザー入力で上書き）
pub async fn generate_automation_plan(
    relay: &RelayClient,
    confirmed: &ConfirmedStoreData,
    images: &[EncodedImage],
) -> Result<Plan> {
    let stage = AnalysisStage::Planning;
    let prompt = build_planning_prompt(confirmed);
    tracing::debug!(stage = stage.label(), prompt_len = prompt.len(), "プロンプト生成");

    let request = RelayRequest::new(stage, prompt, images.to_vec());
    let value = relay.generate(&request).await?;
    let result = parse_analysis(value)?;

    let overrides = labor_overrides(&result, &confirmed.input);
    for o in &overrides {
        tracing::debug!(
            field = o.field,
            ai_value = ?o.ai_value,
            user_value = o.user_value,
            "AI推定の人件費を入力値で上書き"
        );
    }

    Ok(Plan {
        result: reconcile(result, &confirmed.input),
        overrides,
    })
}
