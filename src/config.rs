use crate::error::{CricketError, Result};
use crate::loader::PlayerSheetLayout;
use cricket_stats_common::DEFAULT_PLAYER_COLUMNS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";
pub const CRICAPI_KEY_ENV: &str = "CRICAPI_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub cricapi_api_key: Option<String>,
    pub gemini_model: String,
    pub player_data_path: PathBuf,
    pub player_sheet: String,
    /// ヘッダー行（0始まり）。これより上の行は読み飛ばす
    pub player_header_row: u32,
    pub player_columns: Vec<String>,
    pub team_data_path: PathBuf,
    pub team_sheet: String,
    pub bind_addr: String,
    pub gemini_timeout_seconds: u64,
    pub cricapi_timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            cricapi_api_key: None,
            gemini_model: "gemini-1.5-pro".into(),
            player_data_path: PathBuf::from("IPLBAT4.xlsx"),
            player_sheet: "Batsmen".into(),
            player_header_row: 2,
            player_columns: DEFAULT_PLAYER_COLUMNS.iter().map(|c| c.to_string()).collect(),
            team_data_path: PathBuf::from("ipl.xlsx"),
            team_sheet: "Sheet1".into(),
            bind_addr: "0.0.0.0:5000".into(),
            gemini_timeout_seconds: 30,
            cricapi_timeout_seconds: 10,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（ファイルが無ければ既定値）
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CricketError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("cricket-stats").join("config.json"))
    }

    /// Gemini APIキー（環境変数を優先）
    pub fn gemini_api_key(&self) -> Result<String> {
        key_from_env_or(GEMINI_KEY_ENV, self.gemini_api_key.as_deref())
            .ok_or(CricketError::MissingApiKey("Gemini"))
    }

    /// CricAPIキー（環境変数を優先）
    pub fn cricapi_api_key(&self) -> Result<String> {
        key_from_env_or(CRICAPI_KEY_ENV, self.cricapi_api_key.as_deref())
            .ok_or(CricketError::MissingApiKey("CricAPI"))
    }

    pub fn set_gemini_key(&mut self, key: String) -> Result<()> {
        self.gemini_api_key = Some(key);
        self.save()
    }

    pub fn set_cricapi_key(&mut self, key: String) -> Result<()> {
        self.cricapi_api_key = Some(key);
        self.save()
    }

    pub fn player_layout(&self) -> PlayerSheetLayout {
        PlayerSheetLayout {
            sheet: self.player_sheet.clone(),
            header_row: self.player_header_row,
            columns: self.player_columns.clone(),
        }
    }
}

fn key_from_env_or(var: &str, stored: Option<&str>) -> Option<String> {
    std::env::var(var)
        .ok()
        .or_else(|| stored.map(str::to_string))
        .filter(|k| !k.trim().is_empty())
}
