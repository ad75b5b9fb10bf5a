//! Cricket Stats Common Library
//!
//! CLIとHTTPサーバで共有される型と、IOを持たない集計・予測ロジック

pub mod types;
pub mod error;
pub mod reshape;
pub mod table;
pub mod predictor;
pub mod team;
pub mod parser;
pub mod prompts;
pub mod feed;

pub use types::{MatchBuckets, MatchStatus, MatchSummary, PlayerFixtureRecord, Score, TeamRecord};
pub use error::{Error, Result};
pub use reshape::{melt, Cell, WideSheet, DEFAULT_PLAYER_COLUMNS};
pub use table::{PlayerTable, RoleFilter};
pub use predictor::{predict, predict_text, DiceRoll, Prediction, RngDice, ThreadDice, WicketBand};
pub use team::{TeamComparison, TeamTable};
pub use parser::{extract_json, parse_cricapi_matches, parse_generated_matches};
pub use prompts::build_match_feed_prompt;
pub use feed::bucket_matches;
