//! スプレッドシート読み込み
//!
//! calamineでxlsxを読み、セルを `Cell` に変換して共通ライブラリの変換処理に渡す。

pub mod cache;

pub use cache::PlayerTableCache;

use crate::error::{CricketError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use cricket_stats_common::{melt, Cell, PlayerTable, TeamTable, WideSheet};
use std::path::Path;
use tracing::debug;

/// 選手シートの構成
#[derive(Debug, Clone)]
pub struct PlayerSheetLayout {
    pub sheet: String,
    /// ヘッダー行（0始まり）。ファイル側の列名は使わず `columns` で置き換える
    pub header_row: u32,
    pub columns: Vec<String>,
}

/// 選手シートを読み込み、縦持ちテーブルに変換
pub fn load_player_table(path: &Path, layout: &PlayerSheetLayout) -> Result<PlayerTable> {
    let range = read_range(path, &layout.sheet)?;
    let (end_row, end_col) = range
        .end()
        .ok_or_else(|| CricketError::Schema(format!("シートが空です: {}", layout.sheet)))?;

    if end_row < layout.header_row {
        return Err(CricketError::Schema(format!(
            "ヘッダー行がありません: {}行目",
            layout.header_row + 1
        )));
    }

    let width = end_col as usize + 1;
    if width < layout.columns.len() {
        return Err(CricketError::Schema(format!(
            "列数が不足しています: {}列（期待値 {}列）",
            width,
            layout.columns.len()
        )));
    }

    let rows = read_rows(&range, layout.header_row + 1, end_row, layout.columns.len());
    debug!(sheet = %layout.sheet, rows = rows.len(), "選手シート読み込み");

    let sheet = WideSheet::new(layout.columns.clone(), rows);
    melt(&sheet).map_err(schema_error)
}

/// チームシートを読み込み（先頭行がヘッダー）
pub fn load_team_table(path: &Path, sheet_name: &str) -> Result<TeamTable> {
    let range = read_range(path, sheet_name)?;
    let (end_row, end_col) = range
        .end()
        .ok_or_else(|| CricketError::Schema(format!("シートが空です: {}", sheet_name)))?;

    let width = end_col as usize + 1;
    let columns = read_rows(&range, 0, 0, width)
        .into_iter()
        .next()
        .unwrap_or_default()
        .iter()
        .map(Cell::as_text)
        .collect();
    let rows = read_rows(&range, 1, end_row, width);

    TeamTable::from_sheet(&WideSheet::new(columns, rows)).map_err(schema_error)
}

fn read_range(path: &Path, sheet_name: &str) -> Result<Range<Data>> {
    if !path.exists() {
        return Err(CricketError::FileNotFound(path.display().to_string()));
    }

    let mut workbook =
        open_workbook_auto(path).map_err(|e| CricketError::Spreadsheet(e.to_string()))?;
    workbook
        .worksheet_range(sheet_name)
        .map_err(|e| CricketError::Spreadsheet(format!("{}: {}", sheet_name, e)))
}

/// 絶対座標 [first_row, last_row] × [0, width) のセルを読む
fn read_rows(range: &Range<Data>, first_row: u32, last_row: u32, width: usize) -> Vec<Vec<Cell>> {
    (first_row..=last_row)
        .map(|row| {
            (0..width as u32)
                .map(|col| range.get_value((row, col)).map(to_cell).unwrap_or_default())
                .collect()
        })
        .collect()
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        _ => Cell::Empty,
    }
}

fn schema_error(e: cricket_stats_common::Error) -> CricketError {
    match e {
        cricket_stats_common::Error::Schema(msg) => CricketError::Schema(msg),
        other => other.into(),
    }
}
