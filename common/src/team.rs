//! チーム勝率比較
//!
//! 2チームの勝率を合計100%に正規化し、勝者と差（信頼度）を出す。

use crate::error::{Error, Result};
use crate::reshape::{Cell, WideSheet};
use crate::types::TeamRecord;
use serde::{Deserialize, Serialize};

pub const TEAM_COLUMN: &str = "Team";
pub const MATCHES_PLAYED_COLUMN: &str = "Matches Played";
pub const WINS_COLUMN: &str = "Wins";

pub const TIE: &str = "Tie";

/// 比較結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamComparison {
    pub winner: String,
    pub team1_win_percentage: f64,
    pub team2_win_percentage: f64,
    /// 差（ポイント）を "20.00%" 形式で
    pub confidence: String,
    /// 元の勝率（%）
    pub team1_win_rate: f64,
    pub team2_win_rate: f64,
}

/// チーム成績テーブル（シート順）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamTable {
    records: Vec<TeamRecord>,
}

impl TeamTable {
    pub fn new(records: Vec<TeamRecord>) -> Self {
        Self { records }
    }

    /// ヘッダー付きシートから作成
    ///
    /// Team / Matches Played / Wins の3列を列名で探す。
    /// いずれかが欠けた行、数値にならない行、試合数0の行は除外する。
    pub fn from_sheet(sheet: &WideSheet) -> Result<Self> {
        let index = |name: &str| {
            sheet
                .columns
                .iter()
                .position(|c| c.trim() == name)
                .ok_or_else(|| Error::Schema(format!("{}列がありません", name)))
        };
        let team_idx = index(TEAM_COLUMN)?;
        let played_idx = index(MATCHES_PLAYED_COLUMN)?;
        let wins_idx = index(WINS_COLUMN)?;

        let records = sheet
            .rows
            .iter()
            .filter_map(|row| {
                let team = row.get(team_idx)?.as_text();
                if team.is_empty() {
                    return None;
                }
                let played = count(row.get(played_idx)?)?;
                let wins = count(row.get(wins_idx)?)?;
                TeamRecord::new(team, played, wins)
            })
            .collect();

        Ok(Self { records })
    }

    pub fn records(&self) -> &[TeamRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// チーム名一覧（シート順）
    pub fn teams(&self) -> Vec<String> {
        self.records.iter().map(|r| r.team.clone()).collect()
    }

    pub fn win_rate(&self, team: &str) -> Option<f64> {
        self.records.iter().find(|r| r.team == team).map(|r| r.win_rate)
    }

    /// 2チームを比較
    ///
    /// 未知のチーム、空、同一チームの場合は None
    pub fn compare(&self, team1: &str, team2: &str) -> Option<TeamComparison> {
        if team1.is_empty() || team2.is_empty() || team1 == team2 {
            return None;
        }
        let rate1 = self.win_rate(team1)?;
        let rate2 = self.win_rate(team2)?;
        Some(compare_rates(team1, rate1, team2, rate2))
    }
}

/// 勝率ペアを正規化して比較
pub fn compare_rates(team1: &str, rate1: f64, team2: &str, rate2: f64) -> TeamComparison {
    let total = rate1 + rate2;
    let (pct1, pct2) = if total > 0.0 {
        (round2(rate1 / total * 100.0), round2(rate2 / total * 100.0))
    } else {
        (50.0, 50.0)
    };

    let winner = if pct1 > pct2 {
        team1
    } else if pct2 > pct1 {
        team2
    } else {
        TIE
    };

    TeamComparison {
        winner: winner.to_string(),
        team1_win_percentage: pct1,
        team2_win_percentage: pct2,
        confidence: format!("{:.2}%", (pct1 - pct2).abs()),
        team1_win_rate: round2(rate1 * 100.0),
        team2_win_rate: round2(rate2 * 100.0),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn count(cell: &Cell) -> Option<u32> {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        Cell::Empty => return None,
    };
    let is_count = value.is_finite()
        && value >= 0.0
        && value.fract() == 0.0
        && value <= u32::MAX as f64;
    is_count.then(|| value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;

    fn table() -> TeamTable {
        TeamTable::new(vec![
            TeamRecord::new("CSK", 10, 6).unwrap(),
            TeamRecord::new("MI", 10, 4).unwrap(),
            TeamRecord::new("RCB", 20, 8).unwrap(),
        ])
    }

    #[test]
    fn test_compare_sixty_forty() {
        let result = table().compare("CSK", "MI").unwrap();
        assert_float_absolute_eq!(60.0, result.team1_win_percentage, 1e-9);
        assert_float_absolute_eq!(40.0, result.team2_win_percentage, 1e-9);
        assert_eq!(result.winner, "CSK");
        assert_eq!(result.confidence, "20.00%");
        assert_float_absolute_eq!(60.0, result.team1_win_rate, 1e-9);
        assert_float_absolute_eq!(40.0, result.team2_win_rate, 1e-9);
    }

    #[test]
    fn test_compare_second_team_wins() {
        let result = table().compare("MI", "CSK").unwrap();
        assert_eq!(result.winner, "CSK");
    }

    #[test]
    fn test_compare_equal_rates_is_tie() {
        // MI: 4/10, RCB: 8/20
        let result = table().compare("MI", "RCB").unwrap();
        assert_eq!(result.winner, TIE);
        assert_eq!(result.confidence, "0.00%");
    }

    #[test]
    fn test_compare_zero_rates_is_tie() {
        let result = compare_rates("A", 0.0, "B", 0.0);
        assert_eq!(result.winner, TIE);
        assert_float_absolute_eq!(50.0, result.team1_win_percentage, 1e-9);
    }

    #[test]
    fn test_compare_no_prediction() {
        let t = table();
        assert!(t.compare("CSK", "CSK").is_none());
        assert!(t.compare("CSK", "KKR").is_none());
        assert!(t.compare("", "MI").is_none());
    }

    #[test]
    fn test_compare_percentages_rounded() {
        let result = compare_rates("A", 1.0 / 3.0, "B", 0.5);
        assert_float_absolute_eq!(40.0, result.team1_win_percentage, 1e-9);
        assert_float_absolute_eq!(60.0, result.team2_win_percentage, 1e-9);
        assert_float_absolute_eq!(33.33, result.team1_win_rate, 1e-9);
    }

    #[test]
    fn test_from_sheet() {
        let sheet = WideSheet::new(
            vec!["Team".into(), "Matches Played".into(), "Wins".into(), "Notes".into()],
            vec![
                vec![Cell::Text(" CSK ".into()), Cell::Number(10.0), Cell::Number(6.0)],
                vec![Cell::Text("MI".into()), Cell::Text("10".into()), Cell::Number(4.0)],
                vec![Cell::Text("GT".into()), Cell::Empty, Cell::Number(4.0)],
                vec![Cell::Text("NEW".into()), Cell::Number(0.0), Cell::Number(0.0)],
                vec![Cell::Empty, Cell::Number(3.0), Cell::Number(1.0)],
            ],
        );

        let table = TeamTable::from_sheet(&sheet).unwrap();
        assert_eq!(table.teams(), vec!["CSK", "MI"]);
        assert_eq!(table.win_rate("CSK"), Some(0.6));
    }

    #[test]
    fn test_from_sheet_rejects_non_integral_counts() {
        let sheet = WideSheet::new(
            vec!["Team".into(), "Matches Played".into(), "Wins".into()],
            vec![
                vec![Cell::Text("CSK".into()), Cell::Number(10.0), Cell::Number(6.0)],
                vec![Cell::Text("MI".into()), Cell::Number(10.0), Cell::Number(4.6)],
                vec![Cell::Text("RCB".into()), Cell::Text("12.5".into()), Cell::Number(6.0)],
                vec![Cell::Text("KKR".into()), Cell::Number(1e12), Cell::Number(5.0)],
                vec![Cell::Text("SRH".into()), Cell::Number(-4.0), Cell::Number(1.0)],
            ],
        );

        let table = TeamTable::from_sheet(&sheet).unwrap();
        assert_eq!(table.teams(), vec!["CSK"]);
    }

    #[test]
    fn test_from_sheet_missing_column() {
        let sheet = WideSheet::new(vec!["Team".into(), "Wins".into()], vec![]);
        assert!(matches!(TeamTable::from_sheet(&sheet), Err(Error::Schema(_))));
    }
}
