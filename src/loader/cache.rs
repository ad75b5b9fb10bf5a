//! 選手テーブルのキャッシュ
//!
//! 初回アクセス時にスプレッドシートを読み込み、以降はプロセス終了まで同じテーブルを返す。
//! 失敗はキャッシュしないため、次回アクセスで再読み込みされる。

use super::{load_player_table, PlayerSheetLayout};
use crate::error::{CricketError, Result};
use cricket_stats_common::PlayerTable;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub struct PlayerTableCache {
    path: PathBuf,
    layout: PlayerSheetLayout,
    table: OnceCell<Arc<PlayerTable>>,
}

impl PlayerTableCache {
    pub fn new(path: PathBuf, layout: PlayerSheetLayout) -> Self {
        Self {
            path,
            layout,
            table: OnceCell::new(),
        }
    }

    /// テーブルを取得（未読み込みなら読み込む）
    ///
    /// 初回のみブロッキングIOが発生する。
    pub fn get_or_load(&self) -> Result<Arc<PlayerTable>> {
        self.table
            .get_or_try_init(|| {
                let table = load_player_table(&self.path, &self.layout)?;
                info!(path = %self.path.display(), records = table.len(), "選手データ読み込み完了");
                Ok::<_, CricketError>(Arc::new(table))
            })
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }
}
