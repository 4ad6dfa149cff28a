//! 人件費の照合（ユーザー入力で上書き）
//!
//! AIが画像やテキストから読み違えた人件費を、ユーザーの入力値で置き換える。
//! 対象は `current_cost` の5項目のみ。その他のレポート内容には触れない。

use crate::types::{AnalysisResult, StoreInput};

/// 上書きされた項目（AI推定値とユーザー入力値）
///
/// `ai_value` が `None` の場合、AIの値は欠落または読み取れなかった。
#[derive(Debug, Clone, PartialEq)]
pub struct LaborOverride {
    pub field: &'static str,
    pub ai_value: Option<f64>,
    pub user_value: f64,
}

/// `current_cost` の人件費5項目をユーザー入力で上書き
///
/// 純粋関数で冪等（2回適用しても結果は同じ）。
pub fn reconcile(mut result: AnalysisResult, input: &StoreInput) -> AnalysisResult {
    let cost = &mut result.current_cost;
    cost.employee_count_ft = Some(input.employee_count_ft);
    cost.employee_cost_ft = Some(input.employee_cost_ft);
    cost.employee_count_pt = Some(input.employee_count_pt);
    cost.employee_cost_pt = Some(input.employee_cost_pt);
    cost.monthly_labor_cost = Some(input.total_labor_cost());
    result
}

/// AI推定値とユーザー入力が食い違う項目を列挙（上書き前の結果に対して使う）
pub fn labor_overrides(result: &AnalysisResult, input: &StoreInput) -> Vec<LaborOverride> {
    let cost = &result.current_cost;
    let pairs = [
        ("employee_count_ft", cost.employee_count_ft.map(f64::from), f64::from(input.employee_count_ft)),
        ("employee_cost_ft", cost.employee_cost_ft, input.employee_cost_ft),
        ("employee_count_pt", cost.employee_count_pt.map(f64::from), f64::from(input.employee_count_pt)),
        ("employee_cost_pt", cost.employee_cost_pt, input.employee_cost_pt),
        ("monthly_labor_cost", cost.monthly_labor_cost, input.total_labor_cost()),
    ];

    pairs
        .into_iter()
        .filter(|(_, ai, user)| *ai != Some(*user))
        .map(|(field, ai_value, user_value)| LaborOverride {
            field,
            ai_value,
            user_value,
        })
        .collect()
}
