//! HTTPサーバ
//!
//! - `/player`: 選手成績予測
//! - `/team`: チーム比較
//! - `/matches`: 試合フィード

mod handlers;

pub use handlers::{
    build_player_view, build_team_view, PlayerForm, PlayerView, TeamForm, TeamView,
};

use crate::config::Config;
use crate::feed::{ApiSources, MatchSource};
use crate::loader::{load_team_table, PlayerTableCache};
use anyhow::Context;
use axum::routing::get;
use axum::Router;
use cricket_stats_common::TeamTable;
use std::sync::Arc;
use tracing::{info, warn};

pub struct AppState<S: MatchSource = ApiSources> {
    pub players: PlayerTableCache,
    /// 起動時に読めなかった場合は None（チーム比較のみ無効）
    pub teams: Option<TeamTable>,
    pub sources: S,
}

impl AppState<ApiSources> {
    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let teams = match load_team_table(&config.team_data_path, &config.team_sheet) {
            Ok(table) => {
                info!(teams = table.records().len(), "チームデータ読み込み完了");
                Some(table)
            }
            Err(e) => {
                warn!("{}。チーム比較は無効になります", e);
                None
            }
        };

        Ok(Self {
            players: PlayerTableCache::new(config.player_data_path.clone(), config.player_layout()),
            teams,
            sources: ApiSources::from_config(config)?,
        })
    }
}

pub fn router<S: MatchSource + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/player", get(handlers::player_get::<S>).post(handlers::player_post::<S>))
        .route("/team", get(handlers::team_get::<S>).post(handlers::team_post::<S>))
        .route("/matches", get(handlers::matches::<S>))
        .with_state(state)
}

/// サーバを起動（終了まで戻らない）
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("bind failed: {}", config.bind_addr))?;
    info!("listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
