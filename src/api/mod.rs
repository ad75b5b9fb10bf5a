//! 外部API連携
//!
//! - gemini: 生成AIで live / upcoming の試合一覧を作らせる
//! - cricapi: 直近の試合（completed 判定用）

pub mod cricapi;
pub mod gemini;

pub use cricapi::CricApiClient;
pub use gemini::GeminiClient;

use crate::error::Result;
use std::time::Duration;

fn build_http_client(timeout_seconds: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()?)
}
