//! 解析結果のターミナル表示と保存
//!
//! `current_cost` 以外のレポート内容はスキーマを持たないため、
//! JSON値を再帰的にインデント付きテキストへ展開する。

use crate::error::Result;
use autorestaurant_common::{
    AnalysisResult, ConfirmedStoreData, EnvironmentAnalysis, LaborOverride, StoreInput,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Write as _};
use std::path::Path;

/// `--output` で保存するレポートファイル
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedReport {
    pub generated_at: DateTime<Local>,
    pub input: StoreInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<ConfirmedStoreData>,
    pub result: AnalysisResult,
}

impl SavedReport {
    pub fn new(
        input: StoreInput,
        environment: Option<EnvironmentAnalysis>,
        confirmed: Option<ConfirmedStoreData>,
        result: AnalysisResult,
    ) -> Self {
        Self {
            generated_at: Local::now(),
            input,
            environment,
            confirmed,
            result,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Step1の推定結果
pub fn render_environment(env: &EnvironmentAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "■ 店舗環境（AI推定）");
    let _ = writeln!(out, "  業種: {}", display_or_dash(&env.store_category));
    let _ = writeln!(out, "  ホール: {}평", env.estimated_hall_size);
    let _ = writeln!(out, "  厨房: {}평", env.estimated_kitchen_size);
    let _ = writeln!(out, "  テーブル数: {}", env.estimated_tables);
    let _ = writeln!(
        out,
        "  テーブルタブレット: {}",
        if env.has_table_tablets { "あり" } else { "なし" }
    );
    if env.detected_equipment.is_empty() {
        let _ = writeln!(out, "  検出機器: -");
    } else {
        let _ = writeln!(out, "  検出機器: {}", env.detected_equipment.join(", "));
    }
    out
}

/// Step2の結果（照合済み）
pub fn render_report(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let cost = &result.current_cost;

    let _ = writeln!(out, "■ 現状コスト");
    let _ = writeln!(
        out,
        "  正社員: {}名 / {}만원",
        or_dash(cost.employee_count_ft),
        or_dash(cost.employee_cost_ft)
    );
    let _ = writeln!(
        out,
        "  アルバイト: {}名 / {}만원",
        or_dash(cost.employee_count_pt),
        or_dash(cost.employee_cost_pt)
    );
    let _ = writeln!(out, "  月間人件費: {}만원", or_dash(cost.monthly_labor_cost));
    for (key, value) in &cost.extra {
        write_entry(&mut out, key, value, 1);
    }

    for (key, value) in &result.report {
        let _ = writeln!(out);
        let _ = writeln!(out, "■ {}", key);
        write_value(&mut out, value, 1);
    }

    out
}

/// 照合で上書きした人件費項目
pub fn render_overrides(overrides: &[LaborOverride]) -> String {
    let mut out = String::new();
    if overrides.is_empty() {
        return out;
    }
    let _ = writeln!(out, "※ AI推定の人件費を入力値で上書きしました");
    for o in overrides {
        let _ = writeln!(out, "  {}: {} → {}", o.field, or_dash(o.ai_value), o.user_value);
    }
    out
}

fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn display_or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("-".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn write_entry(out: &mut String, key: &str, value: &Value, depth: usize) {
    let pad = "  ".repeat(depth);
    match scalar(value) {
        Some(s) => {
            let _ = writeln!(out, "{}{}: {}", pad, key, s);
        }
        None => {
            let _ = writeln!(out, "{}{}:", pad, key);
            write_value(out, value, depth + 1);
        }
    }
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    let pad = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                write_entry(out, k, v, depth);
            }
        }
        Value::Array(items) => {
            for item in items {
                match scalar(item) {
                    Some(s) => {
                        let _ = writeln!(out, "{}- {}", pad, s);
                    }
                    None => {
                        let _ = writeln!(out, "{}-", pad);
                        write_value(out, item, depth + 1);
                    }
                }
            }
        }
        other => {
            if let Some(s) = scalar(other) {
                let _ = writeln!(out, "{}{}", pad, s);
            }
        }
    }
}
