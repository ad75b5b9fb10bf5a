//! 試合の振り分け
//!
//! 生成AI由来の試合は live / upcoming、CricAPI由来の試合は completed に振り分ける。
//! どれにも該当しない試合は捨てる。

use crate::types::{MatchBuckets, MatchStatus, MatchSummary};

const LIVE_KEYWORDS: &[&str] = &["live", "in progress"];
const UPCOMING_KEYWORDS: &[&str] = &["upcoming", "scheduled"];
const COMPLETED_KEYWORDS: &[&str] = &["completed", "won", "result"];

fn contains_any(status: &str, keywords: &[&str]) -> bool {
    let status = status.to_lowercase();
    keywords.iter().any(|k| status.contains(k))
}

/// 生成AI由来の状況テキストを分類（live を優先）
pub fn classify_generated(status: &str) -> MatchStatus {
    if contains_any(status, LIVE_KEYWORDS) {
        MatchStatus::Live
    } else if contains_any(status, UPCOMING_KEYWORDS) {
        MatchStatus::Upcoming
    } else {
        MatchStatus::Unknown
    }
}

/// CricAPI由来の状況テキストを分類
pub fn classify_completed(status: &str) -> MatchStatus {
    if contains_any(status, COMPLETED_KEYWORDS) {
        MatchStatus::Completed
    } else {
        MatchStatus::Unknown
    }
}

/// 2つのソースの試合を振り分ける
///
/// # Arguments
/// * `generated` - 生成AIの試合一覧
/// * `current` - CricAPIの試合一覧
pub fn bucket_matches(generated: Vec<MatchSummary>, current: Vec<MatchSummary>) -> MatchBuckets {
    let mut buckets = MatchBuckets::default();

    for mut m in generated {
        m.status = classify_generated(&m.status_text);
        match m.status {
            MatchStatus::Live => buckets.live.push(m),
            MatchStatus::Upcoming => buckets.upcoming.push(m),
            _ => {}
        }
    }

    for mut m in current {
        m.status = classify_completed(&m.status_text);
        if m.status == MatchStatus::Completed {
            buckets.completed.push(m);
        }
    }

    buckets
}
