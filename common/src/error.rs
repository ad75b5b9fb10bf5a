//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("estimate is not finite: {0}")]
    NonFiniteEstimate(f64),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
