use autorestaurant_advisor::{advisor, cli, config, error, interactive, relay, report};
use autorestaurant_common::catalog::equipment_in_category;
use autorestaurant_common::{price_table, StoreInput};
use advisor::{accept_environment, Advisor};
use clap::Parser;
use cli::{Cli, Commands, CostArgs};
use config::Config;
use error::{AdvisorError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use relay::RelayClient;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut config = Config::load()?;

    match cli.command {
        Commands::Analyze { images, input, costs, interactive, relay_url, output } => {
            println!("🍽  autorestaurant - 自動化診断\n");

            let relay_url = relay_url.unwrap_or_else(|| config.relay_url());
            let relay = RelayClient::new(relay_url, Duration::from_secs(config.timeout_seconds))?;
            tracing::debug!(url = relay.url(), "リレー設定");

            let store_input = load_store_input(input.as_deref(), &costs, interactive)?;
            run_analyze(relay, store_input, &images, interactive, output.as_deref(), cli.verbose).await?;
        }

        Commands::Relay { bind } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            relay::serve(&config).await?;
        }

        Commands::Catalog { category } => match category {
            Some(category) => {
                let items = equipment_in_category(&category);
                if items.is_empty() {
                    println!("カテゴリが見つかりません: {}", category);
                } else {
                    for eq in items {
                        println!(
                            "{} / {}: 일시불 {}만원, 렌탈 월 {}만원",
                            eq.maker, eq.model, eq.price_one_time, eq.price_rental
                        );
                    }
                }
            }
            None => print!("{}", price_table()),
        },

        Commands::Config { set_relay_url, show } => {
            if let Some(url) = set_relay_url {
                config.set_relay_url(url)?;
                println!("✔ リレーURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  リレーURL: {}", config.relay_url());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  モデル: {}", config.model);
                println!("  上流URL: {}", config.upstream_url());
                println!("  待ち受け: {}", config.bind);
                println!(
                    "  {}: {}",
                    config::API_KEY_ENV,
                    if config.get_api_key().is_ok() { "設定済み" } else { "未設定" }
                );
            }
        }
    }

    Ok(())
}

/// 店舗データ: JSONファイル → 個別指定で上書き → 対話式で確認
fn load_store_input(path: Option<&Path>, costs: &CostArgs, interactive: bool) -> Result<StoreInput> {
    let base = match path {
        Some(path) => {
            if !path.exists() {
                return Err(AdvisorError::FileNotFound(path.display().to_string()));
            }
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        }
        None => StoreInput::default(),
    };

    if path.is_none() && costs.is_empty() && !interactive {
        tracing::warn!("店舗データが指定されていません（--input / --monthly-sales など）。すべて0として解析します");
    }

    let input = costs.apply(base);
    if interactive {
        interactive::prompt_store_input(input)
    } else {
        Ok(input)
    }
}

async fn run_analyze(
    relay: RelayClient,
    input: StoreInput,
    paths: &[PathBuf],
    interactive: bool,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let mut advisor = Advisor::new(relay);
    advisor.set_input(input)?;

    // 1. 画像収集
    println!("[1/3] 写真を収集中...");
    let count = advisor.select_files(paths)?;
    if count == 0 {
        let joined: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        return Err(AdvisorError::NoImagesFound(joined.join(", ")));
    }
    for image in advisor.session().images() {
        tracing::debug!(image = %image.label(), "解析対象");
    }
    println!("✔ {}枚の写真\n", count);

    // 2. Step1 → 確定 → Step2
    println!("[2/3] AI解析中...");
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("店舗環境を分析中...");

    let status = if interactive {
        advisor
            .submit(|input, env| {
                let confirmed = spinner.suspend(|| {
                    println!("\n{}", report::render_environment(&env));
                    interactive::confirm_environment(input, env)
                })?;
                spinner.set_message("自動化計画を作成中...");
                Ok(confirmed)
            })
            .await?
    } else {
        advisor
            .submit(|input, env| {
                spinner.set_message("自動化計画を作成中...");
                accept_environment(input, env)
            })
            .await?
    };
    spinner.finish_and_clear();

    tracing::debug!(?status, "解析終了");
    let result = advisor.outcome()?;
    println!("✔ 解析完了\n");

    // 3. 表示・保存
    println!("[3/3] レポート\n");
    if !interactive {
        if let Some(env) = advisor.environment() {
            println!("{}", report::render_environment(env));
        }
    }
    print!("{}", report::render_report(result));

    if verbose {
        print!("\n{}", report::render_overrides(advisor.overrides()));
    }

    if let Some(path) = output {
        let saved = report::SavedReport::new(
            *advisor.session().input(),
            advisor.environment().cloned(),
            advisor.confirmed().cloned(),
            result.clone(),
        );
        saved.save(path)?;
        println!("\n✔ レポートを保存: {}", path.display());
    }

    println!("\n✅ 完了");
    Ok(())
}
