use super::AppState;
use crate::error::CricketError;
use crate::feed::{fetch_match_buckets, MatchSource};
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cricket_stats_common::{
    predict_text, DiceRoll, MatchBuckets, PlayerTable, RoleFilter, TeamComparison, TeamTable,
    ThreadDice,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

pub const TEAM_DATA_UNAVAILABLE: &str = "Team data not available";

/// エラー応答（500 + error_message）
pub struct ApiError(String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error_message": self.0 })),
        )
            .into_response()
    }
}

impl From<CricketError> for ApiError {
    fn from(e: CricketError) -> Self {
        if e.is_data_load() {
            error!("データ読み込み失敗: {}", e);
        }
        Self(e.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlayerForm {
    pub team: String,
    pub role: String,
    pub player: String,
    pub opponent: String,
    pub preserve_player: String,
    pub preserve_opponent: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub teams: Vec<String>,
    pub players: Vec<String>,
    pub opponents: Vec<String>,
    pub prediction: Option<String>,
    pub team: String,
    pub role: String,
    pub player: String,
    pub opponent: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TeamForm {
    pub team1: Option<String>,
    pub team2: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamView {
    pub teams: Vec<String>,
    pub prediction: Option<TeamComparison>,
    pub team1: Option<String>,
    pub team2: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchesView {
    pub matches: MatchBuckets,
    pub current_time: String,
}

/// 選手ページの内容を組み立てる
///
/// player / opponent が空なら preserve_* を使う。両方そろったときだけ予測する。
pub fn build_player_view(
    table: &PlayerTable,
    form: PlayerForm,
    dice: &mut impl DiceRoll,
) -> PlayerView {
    let player = if form.player.is_empty() {
        form.preserve_player
    } else {
        form.player
    };
    let opponent = if form.opponent.is_empty() {
        form.preserve_opponent
    } else {
        form.opponent
    };
    let role_filter = form.role.parse::<RoleFilter>().unwrap_or_default();

    let prediction = (!player.is_empty() && !opponent.is_empty())
        .then(|| predict_text(table, &player, &opponent, dice));

    PlayerView {
        teams: table.teams(),
        players: table.players(Some(form.team.as_str()), role_filter),
        opponents: table.opponents(),
        prediction,
        team: form.team,
        role: form.role,
        player,
        opponent,
    }
}

/// チームページの内容を組み立てる
pub fn build_team_view(table: &TeamTable, form: TeamForm) -> TeamView {
    let prediction = match (&form.team1, &form.team2) {
        (Some(t1), Some(t2)) => table.compare(t1, t2),
        _ => None,
    };

    TeamView {
        teams: table.teams(),
        prediction,
        team1: form.team1,
        team2: form.team2,
    }
}

pub async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "routes": ["/player", "/team", "/matches"],
    }))
}

pub async fn player_get<S: MatchSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(form): Query<PlayerForm>,
) -> Result<Json<PlayerView>, ApiError> {
    player_page(state, form).await
}

pub async fn player_post<S: MatchSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Form(form): Form<PlayerForm>,
) -> Result<Json<PlayerView>, ApiError> {
    player_page(state, form).await
}

async fn player_page<S: MatchSource + 'static>(
    state: Arc<AppState<S>>,
    form: PlayerForm,
) -> Result<Json<PlayerView>, ApiError> {
    // 初回はスプレッドシートの読み込みが走るためブロッキングスレッドで実行
    let table = tokio::task::spawn_blocking(move || state.players.get_or_load())
        .await
        .map_err(|e| ApiError(e.to_string()))??;

    Ok(Json(build_player_view(&table, form, &mut ThreadDice::default())))
}

pub async fn team_get<S: MatchSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(form): Query<TeamForm>,
) -> Result<Json<TeamView>, ApiError> {
    team_page(&state, form)
}

pub async fn team_post<S: MatchSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Form(form): Form<TeamForm>,
) -> Result<Json<TeamView>, ApiError> {
    team_page(&state, form)
}

fn team_page<S: MatchSource>(
    state: &AppState<S>,
    form: TeamForm,
) -> Result<Json<TeamView>, ApiError> {
    let table = state
        .teams
        .as_ref()
        .ok_or_else(|| ApiError(TEAM_DATA_UNAVAILABLE.into()))?;
    Ok(Json(build_team_view(table, form)))
}

pub async fn matches<S: MatchSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<MatchesView> {
    let matches = fetch_match_buckets(&state.sources).await;
    Json(MatchesView {
        matches,
        current_time: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    })
}
