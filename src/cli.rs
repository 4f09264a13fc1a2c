use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forge-detect")]
#[command(about = "画像改ざん検出ワークフロー・シミュレータ", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像（またはフォルダ内の画像）を解析
    Analyze {
        /// 画像ファイルまたはフォルダのパス
        #[arg(required = true)]
        path: PathBuf,

        /// レポートJSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 乱数シード（設定ファイル・環境変数より優先）
        #[arg(long)]
        seed: Option<u64>,

        /// 結果をJSONで標準出力に出す
        #[arg(long)]
        json: bool,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// プログレスバーを表示しない
        #[arg(long)]
        no_progress: bool,

        /// レポートに元画像のSHA-256を含める
        #[arg(long)]
        digest: bool,
    },

    /// 解析ステージの一覧を表示
    Stages,

    /// 設定を表示/編集
    Config {
        /// 固定シードを設定
        #[arg(long, conflicts_with = "clear_seed")]
        set_seed: Option<u64>,

        /// 固定シードを解除
        #[arg(long)]
        clear_seed: bool,

        /// アップロード上限（MB）を設定
        #[arg(long)]
        set_max_upload_mb: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
