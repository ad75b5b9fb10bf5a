//! 縦持ち選手テーブル
//!
//! 選択肢一覧（チーム・対戦相手・選手）の抽出もここで行う。

use crate::types::{is_bowler, PlayerFixtureRecord};
use std::collections::BTreeSet;

/// 役割による選手フィルタ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoleFilter {
    Batsman,
    Bowler,
    #[default]
    Any,
}

impl RoleFilter {
    fn accepts(&self, role: &str) -> bool {
        match self {
            RoleFilter::Batsman => !is_bowler(role),
            RoleFilter::Bowler => is_bowler(role),
            RoleFilter::Any => true,
        }
    }
}

impl std::str::FromStr for RoleFilter {
    type Err = String;

    /// 空文字や未知の値は Any（絞り込みなし）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "batsman" => RoleFilter::Batsman,
            "bowler" => RoleFilter::Bowler,
            _ => RoleFilter::Any,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerTable {
    records: Vec<PlayerFixtureRecord>,
}

impl PlayerTable {
    pub fn new(records: Vec<PlayerFixtureRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PlayerFixtureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 指定選手のレコード（テーブル順）
    pub fn player_records<'a>(
        &'a self,
        player: &'a str,
    ) -> impl Iterator<Item = &'a PlayerFixtureRecord> + 'a {
        self.records.iter().filter(move |r| r.player == player)
    }

    /// チーム一覧（ソート済み・重複なし）
    pub fn teams(&self) -> Vec<String> {
        sorted_unique(self.records.iter().map(|r| r.team.as_str()))
    }

    /// 対戦相手一覧（ソート済み・重複なし）
    pub fn opponents(&self) -> Vec<String> {
        sorted_unique(self.records.iter().map(|r| r.opponent.as_str()))
    }

    /// 選手一覧
    ///
    /// # Arguments
    /// * `team` - チームで絞り込み（None または空文字で全チーム）
    /// * `role` - 役割で絞り込み
    pub fn players(&self, team: Option<&str>, role: RoleFilter) -> Vec<String> {
        let team = team.filter(|t| !t.is_empty());
        sorted_unique(
            self.records
                .iter()
                .filter(|r| team.map_or(true, |t| r.team == t))
                .filter(|r| role.accepts(&r.role))
                .map(|r| r.player.as_str()),
        )
    }
}

fn sorted_unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
