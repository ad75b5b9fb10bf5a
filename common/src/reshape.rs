//! 横持ち→縦持ち変換モジュール
//!
//! 1行=1選手、1列=1試合 のシートを
//! 1行=1選手×1試合 のテーブル（PlayerTable）に変換する。

use crate::error::{Error, Result};
use crate::table::PlayerTable;
use crate::types::PlayerFixtureRecord;
use lazy_static::lazy_static;
use regex::Regex;

/// 試合列の列名プレフィックス
pub const FIXTURE_PREFIX: &str = "Match";

pub const PLAYER_COLUMN: &str = "Player";
pub const ROLE_COLUMN: &str = "Role";
pub const TEAM_COLUMN: &str = "Team";
pub const WICKETS_COLUMN: &str = "Wickets";

/// 選手シートの既定列構成
pub const DEFAULT_PLAYER_COLUMNS: &[&str] = &[
    "Player",
    "Role",
    "Season_Performance",
    "Team",
    "Match_5_vs_MI",
    "Match_10_vs_RCB",
    "Match_14_vs_PBKS",
    "Match_18_vs_LSG",
    "Match_23_vs_MI",
    "Match_28_vs_SRH",
    "Match_31_vs_CSK",
    "Match_32_vs_RCB",
    "Unused",
    "Wickets",
];

lazy_static! {
    static ref OPPONENT_RE: Regex = Regex::new(r"vs_([A-Z]+)").unwrap();
}

/// シートのセル値（スプレッドシート形式に依存しない表現）
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// テキストとして取得（前後空白除去、空セルは空文字）
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.trim().to_string(),
        }
    }

    /// 数値として取得
    ///
    /// 不明・空・変換不可は0。テキストは "*"（ノットアウト記号）を除去してから変換する。
    pub fn as_number(&self) -> f64 {
        match self {
            Cell::Number(n) if n.is_finite() => *n,
            Cell::Text(s) => coerce_number(s),
            _ => 0.0,
        }
    }
}

/// "45*" → 45.0, "DNB" → 0.0
pub fn coerce_number(text: &str) -> f64 {
    text.replace('*', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// 列名から対戦相手コードを抽出
///
/// # Examples
/// ```
/// use cricket_stats_common::reshape::extract_opponent;
///
/// assert_eq!(extract_opponent("Match_14_vs_PBKS"), Some("PBKS"));
/// assert_eq!(extract_opponent("Season_Performance"), None);
/// ```
pub fn extract_opponent(column: &str) -> Option<&str> {
    OPPONENT_RE
        .captures(column)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// 横持ちシート
#[derive(Debug, Clone, Default)]
pub struct WideSheet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl WideSheet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::Schema(format!("{}列がありません", name)))
    }
}

/// 縦持ちに変換
///
/// 出力順は列優先（試合1の全選手→試合2の全選手…）。
/// 選手ごとに見ると試合列の順に並ぶ。
pub fn melt(sheet: &WideSheet) -> Result<PlayerTable> {
    let player_idx = sheet.column_index(PLAYER_COLUMN)?;
    let role_idx = sheet.column_index(ROLE_COLUMN)?;
    let team_idx = sheet.column_index(TEAM_COLUMN)?;
    let wickets_idx = sheet.column_index(WICKETS_COLUMN)?;

    let fixtures: Vec<(usize, &str)> = sheet
        .columns
        .iter()
        .enumerate()
        .filter(|(_, name)| name.starts_with(FIXTURE_PREFIX))
        .map(|(i, name)| (i, name.as_str()))
        .collect();

    if fixtures.is_empty() {
        return Err(Error::Schema("試合列がありません".into()));
    }

    let empty = Cell::Empty;
    let cell = |row: &[Cell], idx: usize| -> Cell { row.get(idx).unwrap_or(&empty).clone() };

    // 選手名のない行は除外
    let players: Vec<&Vec<Cell>> = sheet
        .rows
        .iter()
        .filter(|row| !cell(row, player_idx).as_text().is_empty())
        .collect();

    let mut records = Vec::with_capacity(players.len() * fixtures.len());
    for (col_idx, fixture) in &fixtures {
        let opponent = extract_opponent(fixture).unwrap_or_default();
        for row in &players {
            records.push(PlayerFixtureRecord::new(
                cell(row, player_idx).as_text(),
                cell(row, role_idx).as_text(),
                cell(row, team_idx).as_text(),
                fixture.to_string(),
                opponent.to_string(),
                cell(row, *col_idx).as_number(),
                cell(row, wickets_idx).as_number(),
            ));
        }
    }

    Ok(PlayerTable::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_columns() -> Vec<String> {
        DEFAULT_PLAYER_COLUMNS.iter().map(|s| s.to_string()).collect()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn wide_row(player: &str, role: &str, team: &str, perf: [Cell; 8], wickets: Cell) -> Vec<Cell> {
        let mut row = vec![text(player), text(role), Cell::Number(300.0), text(team)];
        row.extend(perf);
        row.push(Cell::Empty);
        row.push(wickets);
        row
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("45*"), 45.0);
        assert_eq!(coerce_number(" 12 "), 12.0);
        assert_eq!(coerce_number("DNB"), 0.0);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("inf"), 0.0);
    }

    #[test]
    fn test_cell_as_text_trims() {
        assert_eq!(text("  Kohli ").as_text(), "Kohli");
        assert_eq!(Cell::Empty.as_text(), "");
    }

    #[test]
    fn test_extract_opponent() {
        assert_eq!(extract_opponent("Match_5_vs_MI"), Some("MI"));
        assert_eq!(extract_opponent("Match_18_vs_LSG"), Some("LSG"));
        assert_eq!(extract_opponent("Unused"), None);
    }

    #[test]
    fn test_melt_one_row_per_fixture() {
        let perf = [
            Cell::Number(10.0),
            text("45*"),
            text("DNB"),
            Cell::Empty,
            Cell::Number(7.0),
            text("12"),
            Cell::Number(0.0),
            text(" 33 "),
        ];
        let sheet = WideSheet::new(
            default_columns(),
            vec![wide_row(" V Kohli ", "Batsman", "RCB", perf, Cell::Number(1.0))],
        );

        let table = melt(&sheet).unwrap();
        let rows: Vec<_> = table.player_records("V Kohli").collect();
        assert_eq!(rows.len(), 8);

        let opponents: Vec<_> = rows.iter().map(|r| r.opponent.as_str()).collect();
        assert_eq!(opponents, vec!["MI", "RCB", "PBKS", "LSG", "MI", "SRH", "CSK", "RCB"]);

        let runs: Vec<_> = rows.iter().map(|r| r.runs).collect();
        assert_eq!(runs, vec![10.0, 45.0, 0.0, 0.0, 7.0, 12.0, 0.0, 33.0]);
        assert!(rows.iter().all(|r| r.wickets == 0.0));
    }

    #[test]
    fn test_melt_drops_rows_without_player() {
        let perf = || std::array::from_fn(|_| Cell::Number(1.0));
        let sheet = WideSheet::new(
            default_columns(),
            vec![
                wide_row("A", "Batsman", "MI", perf(), Cell::Empty),
                wide_row("  ", "Batsman", "MI", perf(), Cell::Empty),
                vec![Cell::Empty],
            ],
        );

        let table = melt(&sheet).unwrap();
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn test_melt_column_major_order() {
        let perf = || std::array::from_fn(|_| Cell::Number(1.0));
        let sheet = WideSheet::new(
            default_columns(),
            vec![
                wide_row("A", "Batsman", "MI", perf(), Cell::Empty),
                wide_row("B", "Bowler", "CSK", perf(), Cell::Number(9.0)),
            ],
        );

        let table = melt(&sheet).unwrap();
        let order: Vec<_> = table.records().iter().take(4).map(|r| r.player.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "A", "B"]);

        let bowler: Vec<_> = table.player_records("B").collect();
        assert!(bowler.iter().all(|r| r.runs == 0.0 && r.wickets == 9.0));
    }

    #[test]
    fn test_melt_short_row_defaults_to_zero() {
        let sheet = WideSheet::new(
            default_columns(),
            vec![vec![text("A"), text("Batsman"), Cell::Empty, text("MI"), Cell::Number(5.0)]],
        );

        let table = melt(&sheet).unwrap();
        let runs: Vec<_> = table.player_records("A").map(|r| r.runs).collect();
        assert_eq!(runs, vec![5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_melt_missing_id_column() {
        let sheet = WideSheet::new(vec!["Player".into(), "Match_1_vs_MI".into()], vec![]);
        let result = melt(&sheet);
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_melt_without_fixture_columns() {
        let columns = ["Player", "Role", "Team", "Wickets"].iter().map(|s| s.to_string()).collect();
        let result = melt(&WideSheet::new(columns, vec![]));
        assert!(matches!(result, Err(Error::Schema(_))));
    }
}
