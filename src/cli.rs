use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cricket-stats")]
#[command(about = "クリケット成績予測・チーム比較・試合フィード", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// HTTPサーバを起動
    Serve {
        /// 待ち受けアドレス（省略時は設定値）
        #[arg(short, long)]
        addr: Option<String>,
    },

    /// 選手の次戦成績を予測
    Predict {
        /// 選手名
        #[arg(short, long, required = true)]
        player: String,

        /// 対戦相手コード（例: MI）
        #[arg(short, long, required = true)]
        opponent: String,

        /// 選手データxlsx（省略時は設定値）
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// チーム・対戦相手・選手の一覧を表示
    Players {
        /// チームで絞り込み
        #[arg(short, long)]
        team: Option<String>,

        /// 役割で絞り込み (batsman/bowler)
        #[arg(short, long, default_value = "")]
        role: String,

        /// 選手データxlsx（省略時は設定値）
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// 2チームの勝率を比較
    Compare {
        #[arg(long, required = true)]
        team1: String,

        #[arg(long, required = true)]
        team2: String,

        /// チームデータxlsx（省略時は設定値）
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// live / upcoming / completed の試合一覧を取得
    Matches {
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 設定を表示/編集
    Config {
        /// Gemini APIキーを設定
        #[arg(long)]
        set_gemini_key: Option<String>,

        /// CricAPIキーを設定
        #[arg(long)]
        set_cricapi_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
