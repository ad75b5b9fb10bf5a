//! 選手成績予測
//!
//! - ボウラー: サイコロ（1〜6）で3段階のウィケット帯を選ぶ
//! - 打者: 直近5試合平均と対戦相手別平均の加重平均からラン範囲を出す
//!
//! ボウラー予測は意図的に非決定的。乱数源は `DiceRoll` で差し替えられる。

use crate::error::{Error, Result};
use crate::table::PlayerTable;
use rand::rngs::ThreadRng;
use rand::Rng;
use std::fmt;

/// 直近フォームに使う試合数
pub const RECENT_FIXTURES: usize = 5;
/// 直近平均の重み
pub const RECENT_WEIGHT: f64 = 0.6;
/// 対戦相手別平均の重み
pub const OPPONENT_WEIGHT: f64 = 0.4;

pub const NO_DATA_TEXT: &str = "No data available for this player";

/// 1〜6の目を返す乱数源
pub trait DiceRoll {
    fn roll(&mut self) -> u8;
}

/// `rand` の乱数生成器を使うサイコロ
pub struct RngDice<R: Rng>(pub R);

/// スレッドローカル乱数のサイコロ
pub type ThreadDice = RngDice<ThreadRng>;

impl Default for ThreadDice {
    fn default() -> Self {
        Self(rand::thread_rng())
    }
}

impl<R: Rng> DiceRoll for RngDice<R> {
    fn roll(&mut self) -> u8 {
        self.0.gen_range(1..=6)
    }
}

/// ボウラーのウィケット帯
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WicketBand {
    Two,
    Three,
    Four,
}

impl WicketBand {
    /// 1-2 → Two, 3-4 → Three, 5-6 → Four
    pub fn from_roll(roll: u8) -> Self {
        match roll {
            0..=2 => WicketBand::Two,
            3..=4 => WicketBand::Three,
            _ => WicketBand::Four,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            WicketBand::Two => "Likely to take 2 wickets (Prediction range: 2–3 wickets)",
            WicketBand::Three => "In good form for 3 wickets (Prediction range: 3–4 wickets)",
            WicketBand::Four => "On fire! Might take 4 wickets (Prediction range: 4–5 wickets)",
        }
    }
}

/// 予測結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prediction {
    /// 選手がテーブルにいない
    NoData,
    Wickets(WicketBand),
    Runs { low: u32, high: u32 },
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::NoData => f.write_str(NO_DATA_TEXT),
            Prediction::Wickets(band) => f.write_str(band.text()),
            Prediction::Runs { low, high } => write!(f, "{}–{} runs", low, high),
        }
    }
}

/// 選手の次戦成績を予測
///
/// # Arguments
/// * `table` - 縦持ち選手テーブル
/// * `player` - 選手名（完全一致）
/// * `opponent` - 対戦相手コード
/// * `dice` - ボウラー予測用の乱数源
///
/// # Returns
/// * `Ok(Prediction::NoData)` - 選手が見つからない
/// * `Err` - 推定値が有限でない
pub fn predict(
    table: &PlayerTable,
    player: &str,
    opponent: &str,
    dice: &mut impl DiceRoll,
) -> Result<Prediction> {
    let records: Vec<_> = table.player_records(player).collect();
    let Some(first) = records.first() else {
        return Ok(Prediction::NoData);
    };

    if first.is_bowler() {
        return Ok(Prediction::Wickets(WicketBand::from_roll(dice.roll())));
    }

    let runs: Vec<f64> = records.iter().map(|r| r.runs).collect();
    let recent = &runs[runs.len().saturating_sub(RECENT_FIXTURES)..];
    let avg_recent = mean(recent);

    let vs_opponent: Vec<f64> = records
        .iter()
        .filter(|r| r.opponent == opponent)
        .map(|r| r.runs)
        .collect();
    let avg_vs_opponent = if vs_opponent.is_empty() {
        avg_recent
    } else {
        mean(&vs_opponent)
    };

    let estimate = RECENT_WEIGHT * avg_recent + OPPONENT_WEIGHT * avg_vs_opponent;
    let (low, high) = run_range(estimate)?;
    Ok(Prediction::Runs { low, high })
}

/// 予測を表示用テキストで返す
///
/// 内部エラーは "Prediction error: ..." として文字列化し、呼び出し側には伝播しない。
pub fn predict_text(
    table: &PlayerTable,
    player: &str,
    opponent: &str,
    dice: &mut impl DiceRoll,
) -> String {
    match predict(table, player, opponent, dice) {
        Ok(prediction) => prediction.to_string(),
        Err(e) => format!("Prediction error: {}", e),
    }
}

/// 推定値からラン範囲を算出
///
/// low = floor(max(0, 0.9·est)), high = round(1.1·est)。
/// low == high のときは high を 5（low < 50）または 10 広げる。
/// 幅の調整はf64で行い、u32への変換は最後に飽和させる。
pub fn run_range(estimate: f64) -> Result<(u32, u32)> {
    if !estimate.is_finite() {
        return Err(Error::NonFiniteEstimate(estimate));
    }

    let low = (estimate * 0.9).max(0.0).floor();
    let mut high = (estimate * 1.1).round().max(0.0);
    if low == high {
        high += if low < 50.0 { 5.0 } else { 10.0 };
    }
    Ok((low as u32, high as u32))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
