//! 解析データの型定義
//!
//! CLIとリレーサーバーで共有される型:
//! - StoreInput: ユーザーが入力する売上・固定費・人件費
//! - EnvironmentAnalysis: Step1（環境分析）の出力
//! - ConfirmedStoreData: Step2に事実として渡す確定データ
//! - EncodedImage: リレーへ送る画像（Base64 + MIMEタイプ）
//! - AnalysisResult: Step2（自動化計画・ROI）の出力

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::workflow::WorkflowError;

/// ユーザー入力の店舗データ（金額の単位は万ウォン）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreInput {
    pub monthly_sales: f64,
    pub monthly_fixed_cost: f64,
    #[serde(rename = "employeeCountFT", alias = "employeeCountFt")]
    pub employee_count_ft: u32,
    #[serde(rename = "employeeCostFT", alias = "employeeCostFt")]
    pub employee_cost_ft: f64,
    #[serde(rename = "employeeCountPT", alias = "employeeCountPt")]
    pub employee_count_pt: u32,
    #[serde(rename = "employeeCostPT", alias = "employeeCostPt")]
    pub employee_cost_pt: f64,
}

impl StoreInput {
    /// 総人件費（正社員 + アルバイト）
    pub fn total_labor_cost(&self) -> f64 {
        self.employee_cost_ft + self.employee_cost_pt
    }

    /// 金額が有限かつ非負であることを検証
    pub fn validate(&self) -> Result<(), WorkflowError> {
        let amounts = [
            ("monthlySales", self.monthly_sales),
            ("monthlyFixedCost", self.monthly_fixed_cost),
            ("employeeCostFT", self.employee_cost_ft),
            ("employeeCostPT", self.employee_cost_pt),
        ];

        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(WorkflowError::InvalidInput(format!(
                    "{} は0以上の数値で入力してください: {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Step1の出力: 画像から推定した店舗環境
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentAnalysis {
    pub store_category: String,

    #[serde(deserialize_with = "estimate_f64")]
    pub estimated_hall_size: f64,       // 坪

    #[serde(deserialize_with = "estimate_f64")]
    pub estimated_kitchen_size: f64,    // 坪

    #[serde(deserialize_with = "estimate_u32")]
    pub estimated_tables: u32,

    #[serde(deserialize_with = "lenient_bool")]
    pub has_table_tablets: bool,

    #[serde(deserialize_with = "lenient_strings")]
    pub detected_equipment: Vec<String>,

    /// スキーマ外のフィールド（表示用に保持）
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Step2に「事実」として渡す確定データ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedStoreData {
    #[serde(flatten)]
    pub input: StoreInput,
    pub store_category: String,
    pub estimated_hall_size: f64,
    pub estimated_kitchen_size: f64,
    pub estimated_tables: u32,
    pub has_table_tablets: bool,
}

impl ConfirmedStoreData {
    /// Step1の推定値をそのまま採用して確定データを作る
    pub fn from_analysis(input: StoreInput, analysis: &EnvironmentAnalysis) -> Self {
        Self {
            input,
            store_category: analysis.store_category.clone(),
            estimated_hall_size: analysis.estimated_hall_size,
            estimated_kitchen_size: analysis.estimated_kitchen_size,
            estimated_tables: analysis.estimated_tables,
            has_table_tablets: analysis.has_table_tablets,
        }
    }
}

/// リレーに送る画像（生成後は不変）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    mime_type: String,
    data: String,
}

impl EncodedImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64エンコード済みデータ
    pub fn data(&self) -> &str {
        &self.data
    }
}

/// 現状コスト（AIの推定値。人件費5項目は照合で上書きされる）
///
/// 人件費5項目は読み取れない値（負数・非数値）を `None` として受け入れる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentCost {
    #[serde(default, deserialize_with = "optional_u32")]
    pub employee_count_ft: Option<u32>,

    #[serde(default, deserialize_with = "optional_f64")]
    pub employee_cost_ft: Option<f64>,

    #[serde(default, deserialize_with = "optional_u32")]
    pub employee_count_pt: Option<u32>,

    #[serde(default, deserialize_with = "optional_f64")]
    pub employee_cost_pt: Option<f64>,

    #[serde(default, deserialize_with = "optional_f64")]
    pub monthly_labor_cost: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Step2の出力: 自動化計画 + ROIレポート
///
/// `current_cost` 以外の内容（推奨機器、ROI、説明文）はAIが生成したまま保持する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub current_cost: CurrentCost,

    #[serde(flatten)]
    pub report: Map<String, Value>,
}

// =============================================
// AI出力向けの寛容なデシリアライザ
// =============================================

/// 数値・数値文字列（"20평", "1,600", "약 25평"）を f64 に変換
///
/// 文字列は最初に現れる数値部分を読む。
fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| *c != ',').collect();
            let start = cleaned.find(|c: char| c.is_ascii_digit())?;
            let negative = cleaned[..start].ends_with('-');
            let digits: String = cleaned[start..]
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            let n: f64 = digits.trim_end_matches('.').parse().ok()?;
            Some(if negative { -n } else { n })
        }
        _ => None,
    }
}

/// 0以上の有限値のみ採用
fn non_negative_number(value: &Value) -> Option<f64> {
    number_from_value(value).filter(|n| n.is_finite() && *n >= 0.0)
}

fn to_count(n: f64) -> u32 {
    n.round().min(u32::MAX as f64) as u32
}

/// Step1の推定値（ユーザーが確認・修正するため、読めない値は0）
fn estimate_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(non_negative_number(&value).unwrap_or(0.0))
}

fn estimate_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(non_negative_number(&value).map(to_count).unwrap_or(0))
}

/// 照合で上書きされる値（読めない値は `None`）
fn optional_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(non_negative_number(&value))
}

fn optional_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(non_negative_number(&value).map(to_count))
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "yes" | "y" | "1" | "있음" | "예"
        ),
        _ => false,
    })
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => vec![other],
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Object(obj) => ["name", "type", "category", "equipment"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_str))
                .map(str::to_string)
                .or_else(|| Some(Value::Object(obj).to_string())),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect())
}
