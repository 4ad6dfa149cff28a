//! 対話式入力（店舗データ入力 / Step1結果の確認・修正）

use crate::error::{AdvisorError, Result};
use autorestaurant_common::{ConfirmedStoreData, EnvironmentAnalysis, StoreInput, STORE_CATEGORIES};
use dialoguer::{Confirm, Input, Select};

fn prompt_error(e: dialoguer::Error) -> AdvisorError {
    AdvisorError::Interactive(e.to_string())
}

fn non_negative(value: &f64) -> std::result::Result<(), &'static str> {
    if value.is_finite() && *value >= 0.0 {
        Ok(())
    } else {
        Err("0以上の数値を入力してください")
    }
}

fn prompt_amount(prompt: &str, default: f64) -> Result<f64> {
    Input::<f64>::new()
        .with_prompt(prompt)
        .default(default)
        .validate_with(non_negative)
        .interact_text()
        .map_err(prompt_error)
}

fn prompt_count(prompt: &str, default: u32) -> Result<u32> {
    Input::<u32>::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()
        .map_err(prompt_error)
}

/// 売上・固定費・人件費を入力（単位: 万ウォン）
pub fn prompt_store_input(defaults: StoreInput) -> Result<StoreInput> {
    println!("💰 店舗データ入力（単位: 만원）");

    Ok(StoreInput {
        monthly_sales: prompt_amount("月売上", defaults.monthly_sales)?,
        monthly_fixed_cost: prompt_amount("月固定費", defaults.monthly_fixed_cost)?,
        employee_count_ft: prompt_count("正社員 人数", defaults.employee_count_ft)?,
        employee_cost_ft: prompt_amount("正社員 人件費合計", defaults.employee_cost_ft)?,
        employee_count_pt: prompt_count("アルバイト 人数", defaults.employee_count_pt)?,
        employee_cost_pt: prompt_amount("アルバイト 人件費合計", defaults.employee_cost_pt)?,
    })
}

/// 業種の選択肢と初期位置
///
/// AIの推定値がリストにない場合は先頭に追加して初期選択にする。
pub fn category_choices(estimated: &str) -> (Vec<String>, usize) {
    let mut items: Vec<String> = STORE_CATEGORIES.iter().map(|c| c.to_string()).collect();
    let estimated = estimated.trim();

    if estimated.is_empty() {
        return (items, 0);
    }

    match items.iter().position(|c| c == estimated) {
        Some(idx) => (items, idx),
        None => {
            items.insert(0, estimated.to_string());
            (items, 0)
        }
    }
}

/// Step1の推定値を確認・修正して確定データにする
pub fn confirm_environment(input: &StoreInput, env: EnvironmentAnalysis) -> Result<ConfirmedStoreData> {
    println!("\n✏️  推定値を確認してください（Enterでそのまま採用）");

    let (items, default) = category_choices(&env.store_category);
    let selected = Select::new()
        .with_prompt("業種")
        .items(&items)
        .default(default)
        .interact()
        .map_err(prompt_error)?;

    let estimated_hall_size = prompt_amount("ホール面積(평)", env.estimated_hall_size)?;
    let estimated_kitchen_size = prompt_amount("厨房面積(평)", env.estimated_kitchen_size)?;
    let estimated_tables = prompt_count("テーブル数", env.estimated_tables)?;
    let has_table_tablets = Confirm::new()
        .with_prompt("テーブルタブレットあり")
        .default(env.has_table_tablets)
        .interact()
        .map_err(prompt_error)?;

    Ok(ConfirmedStoreData {
        input: *input,
        store_category: items[selected].clone(),
        estimated_hall_size,
        estimated_kitchen_size,
        estimated_tables,
        has_table_tablets,
    })
}
