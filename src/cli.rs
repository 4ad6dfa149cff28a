use autorestaurant_common::StoreInput;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "autorestaurant")]
#[command(about = "飲食店自動化AIアドバイザー（店舗写真 + コスト → 自動化計画・ROI）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 店舗写真とコストから自動化計画・ROIを生成
    Analyze {
        /// 店舗写真（ファイルまたはフォルダ）
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// 店舗データJSON（StoreInput形式）
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        costs: CostArgs,

        /// 店舗データとAI推定値を対話式で確認・修正
        #[arg(short = 'I', long)]
        interactive: bool,

        /// リレーURL（設定より優先）
        #[arg(long)]
        relay_url: Option<String>,

        /// レポートJSONの保存先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// リレーサーバーを起動
    Relay {
        /// 待ち受けアドレス（設定より優先）
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// 自動化機器の価格表を表示
    Catalog {
        /// 機器カテゴリで絞り込み
        #[arg(short, long)]
        category: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// リレーURLを設定
        #[arg(long)]
        set_relay_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 店舗データの個別指定（単位: 万ウォン）
#[derive(Args, Debug, Clone, Default)]
pub struct CostArgs {
    /// 月売上
    #[arg(long)]
    pub monthly_sales: Option<f64>,

    /// 月固定費
    #[arg(long)]
    pub monthly_fixed_cost: Option<f64>,

    /// 正社員 人数
    #[arg(long)]
    pub ft_count: Option<u32>,

    /// 正社員 人件費合計
    #[arg(long)]
    pub ft_cost: Option<f64>,

    /// アルバイト 人数
    #[arg(long)]
    pub pt_count: Option<u32>,

    /// アルバイト 人件費合計
    #[arg(long)]
    pub pt_cost: Option<f64>,
}

impl CostArgs {
    /// 指定された項目だけを上書き
    pub fn apply(&self, mut input: StoreInput) -> StoreInput {
        if let Some(v) = self.monthly_sales {
            input.monthly_sales = v;
        }
        if let Some(v) = self.monthly_fixed_cost {
            input.monthly_fixed_cost = v;
        }
        if let Some(v) = self.ft_count {
            input.employee_count_ft = v;
        }
        if let Some(v) = self.ft_cost {
            input.employee_cost_ft = v;
        }
        if let Some(v) = self.pt_count {
            input.employee_count_pt = v;
        }
        if let Some(v) = self.pt_cost {
            input.employee_cost_pt = v;
        }
        input
    }

    pub fn is_empty(&self) -> bool {
        self.monthly_sales.is_none()
            && self.monthly_fixed_cost.is_none()
            && self.ft_count.is_none()
            && self.ft_cost.is_none()
            && self.pt_count.is_none()
            && self.pt_cost.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "autorestaurant",
            "analyze",
            "hall.jpg",
            "kitchen/",
            "--monthly-sales",
            "6000",
            "--ft-cost",
            "900",
            "-o",
            "report.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze { images, costs, output, interactive, .. } => {
                assert_eq!(images, vec![PathBuf::from("hall.jpg"), PathBuf::from("kitchen/")]);
                assert_eq!(costs.monthly_sales, Some(6000.0));
                assert_eq!(costs.ft_cost, Some(900.0));
                assert_eq!(output, Some(PathBuf::from("report.json")));
                assert!(!interactive);
            }
            _ => panic!("analyze expected"),
        }
    }

    #[test]
    fn test_analyze_requires_images() {
        assert!(Cli::try_parse_from(["autorestaurant", "analyze"]).is_err());
    }

    #[test]
    fn test_global_verbose() {
        let cli = Cli::try_parse_from(["autorestaurant", "catalog", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cost_args_apply_partial() {
        let base = StoreInput {
            monthly_sales: 5000.0,
            employee_count_pt: 2,
            employee_cost_pt: 200.0,
            ..Default::default()
        };
        let args = CostArgs {
            monthly_sales: Some(6000.0),
            pt_count: Some(3),
            ..Default::default()
        };

        let applied = args.apply(base);
        assert_eq!(applied.monthly_sales, 6000.0);
        assert_eq!(applied.employee_count_pt, 3);
        assert_eq!(applied.employee_cost_pt, 200.0);
        assert!(!args.is_empty());
        assert!(CostArgs::default().is_empty());
    }
}
