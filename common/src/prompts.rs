//! プロンプト生成モジュール
//!
//! 2段階解析のプロンプトとシステム指示:
//! - Step1（環境分析）: 画像のみから業種・規模・テーブル数・設備を推定
//! - Step2（自動化計画・ROI）: 確定データを事実として与え、計画とROIを生成

use crate::catalog::price_table;
use crate::types::{ConfirmedStoreData, StoreInput};

/// Step1 システム指示
pub const ENVIRONMENT_PROMPT: &str = r#"You are an AI assistant that analyzes restaurant environment photos.
Your tasks:
- Understand the layout: hall, tables, kitchen, cooking equipment.
- Detect fryers, woks, grills, POS, ordering tablets, kiosks, robots.
- Estimate table count, kitchen context, and store style.
- Output ONLY valid JSON following the required schema.
- Never include explanations outside JSON."#;

const PLANNING_PROMPT_HEAD: &str = r#"You are an AI restaurant automation consultant.

Using:
- Confirmed store data
- Detected equipment from images

Generate:
1) A realistic automation plan (robots, kiosks, fryers, etc.)
2) Estimated labor savings
3) Full ROI report (monthly savings, payback period, recommended devices)

Recommend devices only from the reference price table below (unit: 만원).

[EQUIPMENT PRICE TABLE]
"#;

const PLANNING_PROMPT_TAIL: &str = r#"
Strict rules:
- Output ONLY valid JSON, matching the schema
- No additional free text outside JSON"#;

/// Step1 出力形式
const ENVIRONMENT_SCHEMA: &str = r#"{
  "store_category": "업종",
  "estimated_hall_size": 0,
  "estimated_kitchen_size": 0,
  "estimated_tables": 0,
  "has_table_tablets": false,
  "detected_equipment": ["장비명"]
}"#;

/// Step2 出力形式
const PLANNING_SCHEMA: &str = r#"{
  "current_cost": {
    "employee_count_ft": 0,
    "employee_cost_ft": 0,
    "employee_count_pt": 0,
    "employee_cost_pt": 0,
    "monthly_labor_cost": 0,
    "monthly_fixed_cost": 0
  },
  "plan": [
    {"category": "장비군", "maker": "Maker", "model": "모델", "quantity": 1, "purchase_type": "일시불|Rental", "reason": "추천 사유"}
  ],
  "labor_savings": {"ft_reduction": 0, "pt_reduction": 0, "monthly_saving": 0},
  "roi": {"initial_investment": 0, "monthly_rental": 0, "monthly_net_saving": 0, "payback_months": 0},
  "summary": "요약"
}"#;

/// 解析ステージ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    /// Step1: 環境分析
    Environment,
    /// Step2: 自動化計画 + ROI
    Planning,
}

impl AnalysisStage {
    /// ステージごとのシステム指示
    pub fn system_instruction(&self) -> String {
        match self {
            AnalysisStage::Environment => ENVIRONMENT_PROMPT.to_string(),
            AnalysisStage::Planning => planning_system_instruction(),
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            AnalysisStage::Environment => 0.4,
            AnalysisStage::Planning => 0.5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisStage::Environment => "Step1 環境分析",
            AnalysisStage::Planning => "Step2 自動化計画",
        }
    }
}

/// Step2 システム指示（価格表を埋め込む）
pub fn planning_system_instruction() -> String {
    format!("{}{}{}", PLANNING_PROMPT_HEAD, price_table(), PLANNING_PROMPT_TAIL)
}

/// Step1プロンプト生成（画像のみから推定させる）
///
/// 数値入力は渡さない。画像枚数のみを伝える。
pub fn build_environment_prompt(image_count: usize) -> String {
    format!(
        r#"[ENVIRONMENT ANALYSIS REQUEST]
Uploaded store images: {image_count}

Infer the following from the images alone:
- Store category
- Hall size and kitchen size (Pyung)
- Table count
- Whether table order tablets already exist
- Equipment visible in the images (fryers, woks, grills, POS, kiosks, robots)

Output format (JSON only):
{ENVIRONMENT_SCHEMA}"#
    )
}

/// Step2プロンプト生成（確定データを事実として埋め込む）
///
/// 数値は入力値をそのまま埋め込む。
pub fn build_planning_prompt(confirmed: &ConfirmedStoreData) -> String {
    let input: &StoreInput = &confirmed.input;
    let tablets = if confirmed.has_table_tablets { "YES" } else { "NO" };

    format!(
        r#"[CONFIRMED DATA - USE AS FACTS]
Store Category: {category}
Hall Size: {hall} Pyung
Kitchen Size: {kitchen} Pyung
Table Count: {tables} EA
Existing Table Order Tablets: {tablets}

Monthly Sales: {sales} 만원
Monthly Fixed Cost: {fixed} 만원

[LABOR DATA]
Full-time Employees (FT): {count_ft}명 (Total Cost: {cost_ft} 만원)
Part-time Employees (PT): {count_pt}명 (Total Cost: {cost_pt} 만원)
Total Labor Cost: {total} 만원

Please detect specific equipment from images (fryers, woks, machines)
and generate the automation plan and ROI report.

Output format (JSON only):
{PLANNING_SCHEMA}"#,
        category = confirmed.store_category,
        hall = confirmed.estimated_hall_size,
        kitchen = confirmed.estimated_kitchen_size,
        tables = confirmed.estimated_tables,
        sales = input.monthly_sales,
        fixed = input.monthly_fixed_cost,
        count_ft = input.employee_count_ft,
        cost_ft = input.employee_cost_ft,
        count_pt = input.employee_count_pt,
        cost_pt = input.employee_cost_pt,
        total = input.total_labor_cost(),
    )
}
