//! データ型定義
//!
//! CLIとHTTPサーバで共有される型:
//! - PlayerFixtureRecord: 選手×試合の縦持ちレコード
//! - TeamRecord: チーム勝率
//! - MatchSummary / MatchBuckets: 試合フィードの出力

use serde::{Deserialize, Serialize};

/// ボウラー判定に使う役割文字列のマーカー
pub const BOWLER_MARKER: &str = "Bowler";

/// 選手×試合の1レコード（縦持ち）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerFixtureRecord {
    pub player: String,
    pub role: String,
    pub team: String,
    /// 元の列名（例: "Match_5_vs_MI"）
    pub fixture: String,
    /// 対戦相手コード（例: "MI"）
    pub opponent: String,
    /// セルの数値化結果（"*" 除去済み、不正値は0）
    pub performance: f64,
    /// シーズン通算ウィケット列の数値
    pub season_wickets: f64,
    /// 打者のみ: performance、ボウラーは0
    pub runs: f64,
    /// ボウラーのみ: season_wickets、それ以外は0
    pub wickets: f64,
}

impl PlayerFixtureRecord {
    /// 役割からruns/wicketsを導出してレコードを作成
    pub fn new(
        player: String,
        role: String,
        team: String,
        fixture: String,
        opponent: String,
        performance: f64,
        season_wickets: f64,
    ) -> Self {
        let bowler = is_bowler(&role);
        Self {
            runs: if bowler { 0.0 } else { performance },
            wickets: if bowler { season_wickets } else { 0.0 },
            player,
            role,
            team,
            fixture,
            opponent,
            performance,
            season_wickets,
        }
    }

    pub fn is_bowler(&self) -> bool {
        is_bowler(&self.role)
    }
}

pub fn is_bowler(role: &str) -> bool {
    role.contains(BOWLER_MARKER)
}

/// チームの通算成績
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    pub team: String,
    pub matches_played: u32,
    pub wins: u32,
    pub win_rate: f64,
}

impl TeamRecord {
    /// 試合数0のチームは勝率が定義できないためNone
    pub fn new(team: impl Into<String>, matches_played: u32, wins: u32) -> Option<Self> {
        if matches_played == 0 {
            return None;
        }
        Some(Self {
            team: team.into(),
            matches_played,
            wins,
            win_rate: f64::from(wins) / f64::from(matches_played),
        })
    }
}

/// 試合状況
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Live,
    Upcoming,
    Completed,
    #[default]
    Unknown,
}

/// イニングごとのスコア
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Score {
    pub team: String,
    pub runs: u32,
    pub wickets: u32,
    pub overs: f64,
}

/// 試合サマリー（リクエストごとに再構築）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub id: String,
    pub name: String,
    pub teams: Vec<String>,
    pub venue: String,
    /// APIが返した状況テキスト（表示用）
    pub status_text: String,
    pub status: MatchStatus,
    pub scores: Vec<Score>,
    pub date: String,
    pub match_type: String,
    pub series: String,
}

/// live/upcoming/completed に振り分けた試合一覧
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchBuckets {
    pub live: Vec<MatchSummary>,
    pub upcoming: Vec<MatchSummary>,
    pub completed: Vec<MatchSummary>,
}

impl MatchBuckets {
    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && self.upcoming.is_empty() && self.completed.is_empty()
    }
}
