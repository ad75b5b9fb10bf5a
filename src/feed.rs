//! 試合フィード集約
//!
//! 2つの外部ソースを呼び出し、live / upcoming / completed に振り分ける。
//! どちらの呼び出しが失敗しても、そのソースの結果が空になるだけでエラーにはしない。

use crate::api::{CricApiClient, GeminiClient};
use crate::config::Config;
use crate::error::{CricketError, Result};
use async_trait::async_trait;
use cricket_stats_common::{
    bucket_matches, build_match_feed_prompt, parse_cricapi_matches, parse_generated_matches,
    MatchBuckets, MatchSummary,
};
use serde_json::Value;
use tracing::{info, warn};

/// 試合データの取得元
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// 生成AIの応答テキスト（live / upcoming）
    async fn generated_matches_text(&self) -> Result<String>;

    /// CricAPIの応答エンベロープ。200以外は None
    async fn current_matches(&self) -> Result<Option<Value>>;
}

/// 実際のAPIを呼ぶ取得元
///
/// APIキーが無いソースは呼び出し失敗として扱う。
pub struct ApiSources {
    gemini: Option<GeminiClient>,
    cricapi: Option<CricApiClient>,
}

impl ApiSources {
    pub fn from_config(config: &Config) -> Result<Self> {
        let gemini = match config.gemini_api_key() {
            Ok(key) => Some(GeminiClient::new(
                key,
                config.gemini_model.clone(),
                config.gemini_timeout_seconds,
            )?),
            Err(e) => {
                warn!("{}", e);
                None
            }
        };
        let cricapi = match config.cricapi_api_key() {
            Ok(key) => Some(CricApiClient::new(key, config.cricapi_timeout_seconds)?),
            Err(e) => {
                warn!("{}", e);
                None
            }
        };
        Ok(Self { gemini, cricapi })
    }
}

#[async_trait]
impl MatchSource for ApiSources {
    async fn generated_matches_text(&self) -> Result<String> {
        let client = self
            .gemini
            .as_ref()
            .ok_or(CricketError::MissingApiKey("Gemini"))?;
        client.generate(&build_match_feed_prompt()).await
    }

    async fn current_matches(&self) -> Result<Option<Value>> {
        let client = self
            .cricapi
            .as_ref()
            .ok_or(CricketError::MissingApiKey("CricAPI"))?;
        client.current_matches().await
    }
}

/// 試合一覧を取得して振り分ける（エラーを返さない）
pub async fn fetch_match_buckets(source: &impl MatchSource) -> MatchBuckets {
    let generated = or_empty("gemini", generated_matches(source).await);
    let completed = or_empty("cricapi", completed_matches(source).await);

    let buckets = bucket_matches(generated, completed);
    info!(
        live = buckets.live.len(),
        upcoming = buckets.upcoming.len(),
        completed = buckets.completed.len(),
        "試合フィード集約"
    );
    buckets
}

async fn generated_matches(source: &impl MatchSource) -> Result<Vec<MatchSummary>> {
    let text = source.generated_matches_text().await?;
    Ok(parse_generated_matches(&text)?)
}

async fn completed_matches(source: &impl MatchSource) -> Result<Vec<MatchSummary>> {
    Ok(source
        .current_matches()
        .await?
        .map(|envelope| parse_cricapi_matches(&envelope))
        .unwrap_or_default())
}

/// 失敗を警告ログに残して空の値に置き換える
fn or_empty<T: Default>(source: &str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(source, error = %e, "取得失敗、空の結果で継続");
            T::default()
        }
    }
}
