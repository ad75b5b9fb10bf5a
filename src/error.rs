use thiserror::Error;

#[derive(Error, Debug)]
pub enum CricketError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません: {0}。`cricket-stats config` で設定してください")]
    MissingApiKey(&'static str),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("スプレッドシート読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("シート構成が不正: {0}")]
    Schema(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Common(#[from] cricket_stats_common::Error),
}

impl CricketError {
    /// データ読み込み系のエラーか（該当機能のみ停止し、プロセスは継続する）
    pub fn is_data_load(&self) -> bool {
        matches!(
            self,
            CricketError::FileNotFound(_) | CricketError::Spreadsheet(_) | CricketError::Schema(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CricketError>;
