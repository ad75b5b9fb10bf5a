//! CricAPI連携

use super::build_http_client;
use crate::error::{CricketError, Result};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

const CRICAPI_CURRENT_MATCHES_URL: &str = "https://api.cricapi.com/v1/currentMatches";

pub struct CricApiClient {
    client: reqwest::Client,
    api_key: String,
}

impl CricApiClient {
    pub fn new(api_key: String, timeout_seconds: u64) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout_seconds)?,
            api_key,
        })
    }

    /// 直近の試合一覧を取得
    ///
    /// # Returns
    /// * `Ok(Some(envelope))` - 200応答（`data` 配列を含むJSON）
    /// * `Ok(None)` - 200以外の応答（データなし扱い）
    pub async fn current_matches(&self) -> Result<Option<Value>> {
        let response = self
            .client
            .get(CRICAPI_CURRENT_MATCHES_URL)
            .query(&[("apikey", self.api_key.as_str()), ("offset", "0"), ("limit", "10")])
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "CricAPI応答");
        if status != StatusCode::OK {
            return Ok(None);
        }

        let envelope = response
            .json::<Value>()
            .await
            .map_err(|e| CricketError::ApiParse(e.to_string()))?;
        Ok(Some(envelope))
    }
}
