//! AIレスポンスパーサー
//!
//! リレーが返す `result` 文字列からJSONを取り出し、
//! Step1/Step2 の型へ検証付きで変換する

use crate::error::{Error, Result};
use crate::types::{AnalysisResult, EnvironmentAnalysis};
use serde_json::Value;

/// レスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. 生の [...] 配列
/// 4. エラー
///
/// # Examples
/// ```
/// use autorestaurant_common::extract_json;
///
/// let response = "Result: {\"key\": \"value\"}";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"key\": \"value\"}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (response.find(open), response.rfind(close)) {
            if end > start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// リレーの `result` 文字列をJSON値に変換
pub fn parse_result_payload(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Err(Error::Parse("AIの応答が空です".into()));
    }

    let json_str = extract_json(text)?;
    let value = serde_json::from_str(json_str.trim())?;
    Ok(value)
}

/// Step1レスポンスを検証
pub fn parse_environment(value: Value) -> Result<EnvironmentAnalysis> {
    if !value.is_object() {
        return Err(Error::Schema(format!(
            "環境分析の結果はJSONオブジェクトである必要があります: {}",
            kind_of(&value)
        )));
    }

    serde_json::from_value(value)
        .map_err(|e| Error::Schema(format!("環境分析の結果が不正です: {}", e)))
}

/// Step2レスポンスを検証
///
/// `current_cost` オブジェクトが存在しない結果はここで弾く。
pub fn parse_analysis(value: Value) -> Result<AnalysisResult> {
    let current_cost = value
        .as_object()
        .ok_or_else(|| {
            Error::Schema(format!(
                "分析結果はJSONオブジェクトである必要があります: {}",
                kind_of(&value)
            ))
        })?
        .get("current_cost");

    match current_cost {
        Some(Value::Object(_)) => {}
        Some(other) => {
            return Err(Error::Schema(format!(
                "current_cost がオブジェクトではありません: {}",
                kind_of(other)
            )))
        }
        None => return Err(Error::Schema("current_cost がありません".into())),
    }

    serde_json::from_value(value)
        .map_err(|e| Error::Schema(format!("分析結果が不正です: {}", e)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =============================================
    // extract_json テスト
    // =============================================

    #[test]
    fn test_extract_json_with_block() {
        let response = "Here is the report:\n```json\n{\"current_cost\": {}}\n```\nDone.";
        let json = extract_json(response).unwrap();
        assert_eq!(json, "{\"current_cost\": {}}");
    }

    #[test]
    fn test_extract_json_raw_object() {
        let response = r#"{"store_category": "분식"}"#;
        assert_eq!(extract_json(response).unwrap(), response);
    }

    #[test]
    fn test_extract_json_nested_object() {
        let response = r#"prefix {"a": {"b": [1, 2]}, "c": {}} suffix"#;
        assert_eq!(extract_json(response).unwrap(), r#"{"a": {"b": [1, 2]}, "c": {}}"#);
    }

    #[test]
    fn test_extract_json_array() {
        let response = "[1, 2, 3]";
        assert_eq!(extract_json(response).unwrap(), "[1, 2, 3]");
    }

    #[test]
    fn test_extract_json_error() {
        let result = extract_json("No response text generated.");
        if let Err(Error::Parse(msg)) = result {
            assert!(msg.contains("JSONが見つかりません"));
        } else {
            panic!("Expected Parse error");
        }
    }

    // =============================================
    // parse_result_payload テスト
    // =============================================

    #[test]
    fn test_parse_result_payload() {
        let value = parse_result_payload(r#"{"current_cost": {"employee_count_ft": 1}}"#).unwrap();
        assert_eq!(value["current_cost"]["employee_count_ft"], json!(1));
    }

    #[test]
    fn test_parse_result_payload_empty() {
        assert!(matches!(parse_result_payload("  "), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_result_payload_broken_json() {
        let result = parse_result_payload(r#"{"current_cost": {"employee_count_ft": }"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    // =============================================
    // parse_environment テスト
    // =============================================

    #[test]
    fn test_parse_environment() {
        let value = json!({
            "store_category": "한식",
            "estimated_hall_size": 30,
            "estimated_tables": 15,
            "has_table_tablets": true
        });

        let env = parse_environment(value).unwrap();
        assert_eq!(env.store_category, "한식");
        assert_eq!(env.estimated_hall_size, 30.0);
        assert_eq!(env.estimated_tables, 15);
        assert!(env.has_table_tablets);
    }

    #[test]
    fn test_parse_environment_not_object() {
        let result = parse_environment(json!(["치킨"]));
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    // =============================================
    // parse_analysis テスト
    // =============================================

    #[test]
    fn test_parse_analysis() {
        let value = json!({
            "current_cost": {"employee_cost_ft": 600, "monthly_labor_cost": 900},
            "plan": [{"category": "서빙로봇"}]
        });

        let result = parse_analysis(value).unwrap();
        assert_eq!(result.current_cost.employee_cost_ft, Some(600.0));
        assert_eq!(result.report["plan"][0]["category"], json!("서빙로봇"));
    }

    #[test]
    fn test_parse_analysis_missing_current_cost() {
        let result = parse_analysis(json!({"plan": []}));
        match result {
            Err(Error::Schema(msg)) => assert!(msg.contains("current_cost")),
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_analysis_current_cost_wrong_type() {
        let result = parse_analysis(json!({"current_cost": "unknown"}));
        match result {
            Err(Error::Schema(msg)) => assert!(msg.contains("string")),
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_analysis_unreadable_labor_fields() {
        let value = json!({
            "current_cost": {
                "employee_count_ft": -1,
                "employee_cost_ft": "약 300",
                "monthly_labor_cost": "unknown"
            },
            "plan": []
        });

        let result = parse_analysis(value).unwrap();
        assert_eq!(result.current_cost.employee_count_ft, None);
        assert_eq!(result.current_cost.monthly_labor_cost, None);
    }

    #[test]
    fn test_parse_analysis_not_object() {
        assert!(matches!(parse_analysis(json!(42)), Err(Error::Schema(_))));
    }
}
