//! APIレスポンスパーサー
//!
//! - 生成AIの応答テキストからJSONを抽出して試合一覧にする
//! - CricAPIの `data` 配列を試合一覧にする
//!
//! 個々の試合エントリが壊れていてもその試合だけを捨て、残りは使う。
//! スコアは null や数値文字列も受け付け、読めないスコアだけを捨てる。

use crate::error::{Error, Result};
use crate::types::{MatchSummary, Score};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const DEFAULT_MATCH_NAME: &str = "Match";
pub const DEFAULT_VENUE: &str = "Venue not available";
pub const DEFAULT_GENERATED_STATUS: &str = "Unknown Status";
pub const DEFAULT_CRICAPI_STATUS: &str = "Status not available";

/// 応答テキストからJSONオブジェクト部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. ``` ... ``` ブロック
/// 3. 生の {...}
/// 4. エラー
///
/// # Examples
/// ```
/// use cricket_stats_common::extract_json;
///
/// let response = "```json\n{\"matches\": []}\n```";
/// assert_eq!(extract_json(response).unwrap(), "{\"matches\": []}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(block) = fenced_block(response, "```json") {
        return Ok(block);
    }
    if let Some(block) = fenced_block(response, "```") {
        return Ok(block);
    }

    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if end >= start {
            return Ok(&response[start..=end]);
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

fn fenced_block<'a>(response: &'a str, marker: &str) -> Option<&'a str> {
    let start = response.find(marker)? + marker.len();
    let end = start + response[start..].find("```")?;
    Some(response[start..end].trim())
}

#[derive(Deserialize)]
struct GeneratedFeed {
    #[serde(default)]
    matches: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeneratedMatch {
    name: Option<String>,
    teams: Option<Vec<String>>,
    venue: Option<String>,
    status: Option<String>,
    #[serde(deserialize_with = "generated_scores")]
    scores: Vec<Score>,
}

/// 生成AIのスコア（team/runs/wickets/overs）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeneratedScore {
    #[serde(deserialize_with = "lenient_text")]
    team: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    runs: Option<u32>,
    #[serde(deserialize_with = "lenient_count")]
    wickets: Option<u32>,
    #[serde(deserialize_with = "lenient_number")]
    overs: Option<f64>,
}

impl From<GeneratedScore> for Score {
    fn from(s: GeneratedScore) -> Self {
        Score {
            team: s.team.unwrap_or_default(),
            runs: s.runs.unwrap_or_default(),
            wickets: s.wickets.unwrap_or_default(),
            overs: s.overs.unwrap_or_default(),
        }
    }
}

impl From<GeneratedMatch> for MatchSummary {
    fn from(m: GeneratedMatch) -> Self {
        MatchSummary {
            name: m.name.unwrap_or_else(|| DEFAULT_MATCH_NAME.into()),
            teams: m.teams.unwrap_or_default(),
            venue: m.venue.unwrap_or_else(|| DEFAULT_VENUE.into()),
            status_text: m.status.unwrap_or_else(|| DEFAULT_GENERATED_STATUS.into()),
            scores: m.scores,
            ..Default::default()
        }
    }
}

/// 生成AIの応答をパース
///
/// `{"matches": [...]}` 形式を期待する。
///
/// # Returns
/// * `Ok(Vec<MatchSummary>)` - 形式に合わないエントリは除外済み
/// * `Err` - JSONが見つからないかパース失敗
pub fn parse_generated_matches(response: &str) -> Result<Vec<MatchSummary>> {
    let json_str = extract_json(response.trim())?;
    let feed: GeneratedFeed = serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("試合JSONパースエラー: {}", e)))?;

    Ok(feed
        .matches
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| serde_json::from_value::<GeneratedMatch>(v).ok())
        .map(MatchSummary::from)
        .collect())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CricApiMatch {
    id: Option<String>,
    name: Option<String>,
    status: Option<String>,
    date: Option<String>,
    venue: Option<String>,
    teams: Option<Vec<String>>,
    #[serde(deserialize_with = "cricapi_scores")]
    score: Vec<Score>,
    match_type: Option<String>,
    series: Option<String>,
}

/// CricAPIのイニングスコア（r/w/o）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CricApiScore {
    #[serde(deserialize_with = "lenient_count")]
    r: Option<u32>,
    #[serde(deserialize_with = "lenient_count")]
    w: Option<u32>,
    #[serde(deserialize_with = "lenient_number")]
    o: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    inning: Option<String>,
}

impl From<CricApiScore> for Score {
    fn from(s: CricApiScore) -> Self {
        Score {
            team: s.inning.unwrap_or_default(),
            runs: s.r.unwrap_or_default(),
            wickets: s.w.unwrap_or_default(),
            overs: s.o.unwrap_or_default(),
        }
    }
}

impl From<CricApiMatch> for MatchSummary {
    fn from(m: CricApiMatch) -> Self {
        MatchSummary {
            id: m.id.unwrap_or_default(),
            name: m.name.unwrap_or_else(|| DEFAULT_MATCH_NAME.into()),
            teams: m.teams.unwrap_or_default(),
            venue: m.venue.unwrap_or_else(|| DEFAULT_VENUE.into()),
            status_text: m.status.unwrap_or_else(|| DEFAULT_CRICAPI_STATUS.into()),
            scores: m.score,
            date: m.date.unwrap_or_default(),
            match_type: m.match_type.unwrap_or_default(),
            series: m.series.unwrap_or_default(),
            ..Default::default()
        }
    }
}

/// CricAPIの応答エンベロープから試合一覧を取り出す
///
/// `data` が無い・配列でない場合は空
pub fn parse_cricapi_matches(envelope: &Value) -> Vec<MatchSummary> {
    envelope
        .get("data")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| CricApiMatch::deserialize(v).ok())
                .map(MatchSummary::from)
                .collect()
        })
        .unwrap_or_default()
}

fn generated_scores<'de, D>(d: D) -> std::result::Result<Vec<Score>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(score_list::<GeneratedScore>(Value::deserialize(d)?))
}

fn cricapi_scores<'de, D>(d: D) -> std::result::Result<Vec<Score>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(score_list::<CricApiScore>(Value::deserialize(d)?))
}

/// 配列でなければ空。読めない要素は除外
fn score_list<T: DeserializeOwned + Into<Score>>(value: Value) -> Vec<Score> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value::<T>(v).ok())
            .map(Into::into)
            .collect(),
        _ => Vec::new(),
    }
}

/// 数値または数値文字列。null・非数値・非有限は None
fn lenient_number<'de, D>(d: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

/// 非負の数値（小数は切り捨て）
fn lenient_count<'de, D>(d: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(d)?
        .filter(|n| *n >= 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32))
}

fn lenient_text<'de, D>(d: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =============================================
    // extract_json テスト
    // =============================================

    #[test]
    fn test_extract_json_with_block() {
        let response = "```json\n{\"matches\": [{\"name\": \"A vs B\"}]}\n```";
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.contains("A vs B"));
    }

    #[test]
    fn test_extract_json_with_bare_fence() {
        let response = "```\n{\"matches\": []}\n```";
        assert_eq!(extract_json(response).unwrap(), "{\"matches\": []}");
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = r#"Here you go: {"matches": []} hope this helps"#;
        assert_eq!(extract_json(response).unwrap(), r#"{"matches": []}"#);
    }

    #[test]
    fn test_extract_json_error() {
        let result = extract_json("Sorry, I cannot help with that.");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    // =============================================
    // parse_generated_matches テスト
    // =============================================

    #[test]
    fn test_parse_generated_matches() {
        let response = r#"```json
{
  "matches": [
    {
      "name": "CSK vs MI",
      "teams": ["CSK", "MI"],
      "venue": "Chepauk",
      "status": "Live",
      "scores": [
        {"team": "CSK", "runs": 120, "wickets": 3, "overs": 15.2},
        {"team": "MI", "runs": 0, "wickets": 0, "overs": 0}
      ]
    }
  ]
}
```"#;

        let matches = parse_generated_matches(response).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "CSK vs MI");
        assert_eq!(matches[0].teams, vec!["CSK", "MI"]);
        assert_eq!(matches[0].status_text, "Live");
        assert_eq!(matches[0].scores[0].runs, 120);
        assert_eq!(matches[0].scores[0].overs, 15.2);
    }

    #[test]
    fn test_parse_generated_matches_defaults() {
        let matches = parse_generated_matches(r#"{"matches": [{}]}"#).unwrap();
        assert_eq!(matches[0].name, DEFAULT_MATCH_NAME);
        assert_eq!(matches[0].venue, DEFAULT_VENUE);
        assert_eq!(matches[0].status_text, DEFAULT_GENERATED_STATUS);
        assert!(matches[0].teams.is_empty());
    }

    #[test]
    fn test_parse_generated_matches_skips_malformed_entry() {
        let response = r#"{"matches": [
            {"name": "ok", "status": "Upcoming"},
            {"teams": "not a list"},
            42
        ]}"#;
        let matches = parse_generated_matches(response).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "ok");
    }

    #[test]
    fn test_parse_generated_matches_null_scores_kept() {
        let response = r#"{"matches": [{
            "name": "A vs B",
            "teams": ["A", "B"],
            "status": "Upcoming",
            "scores": [{"team": "A", "runs": null, "wickets": null, "overs": null}]
        }]}"#;

        let matches = parse_generated_matches(response).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "A vs B");
        assert_eq!(
            matches[0].scores,
            vec![Score { team: "A".into(), runs: 0, wickets: 0, overs: 0.0 }]
        );
    }

    #[test]
    fn test_parse_generated_matches_string_scores() {
        let response = r#"{"matches": [{
            "name": "C vs D",
            "status": "Live",
            "scores": [
                {"team": "C", "runs": "145", "wickets": "4", "overs": "17.3"},
                "C 145/4",
                {"team": "D", "runs": "yet to bat"}
            ]
        }]}"#;

        let matches = parse_generated_matches(response).unwrap();
        assert_eq!(matches.len(), 1);
        let scores = &matches[0].scores;
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].runs, 145);
        assert_eq!(scores[0].wickets, 4);
        assert_eq!(scores[0].overs, 17.3);
        assert_eq!(scores[1].team, "D");
        assert_eq!(scores[1].runs, 0);
    }

    #[test]
    fn test_parse_generated_matches_scores_not_a_list() {
        let response = r#"{"matches": [
            {"name": "E vs F", "status": "Upcoming", "scores": null},
            {"name": "G vs H", "status": "Upcoming", "scores": "n/a"}
        ]}"#;

        let matches = parse_generated_matches(response).unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.scores.is_empty()));
    }

    #[test]
    fn test_parse_generated_matches_missing_array() {
        assert!(parse_generated_matches(r#"{"other": 1}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_generated_matches_invalid_json() {
        assert!(parse_generated_matches("{ not json }").is_err());
    }

    // =============================================
    // parse_cricapi_matches テスト
    // =============================================

    #[test]
    fn test_parse_cricapi_matches() {
        let envelope = json!({
            "status": "success",
            "data": [{
                "id": "abc-123",
                "name": "RCB vs KKR, 10th Match",
                "matchType": "t20",
                "status": "RCB won by 5 wkts",
                "venue": "Chinnaswamy",
                "date": "2025-04-01",
                "teams": ["RCB", "KKR"],
                "score": [
                    {"r": 180, "w": 6, "o": 20, "inning": "KKR Inning 1"},
                    {"r": 181, "w": 5, "o": 19.3, "inning": "RCB Inning 1"}
                ]
            }]
        });

        let matches = parse_cricapi_matches(&envelope);
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.id, "abc-123");
        assert_eq!(m.match_type, "t20");
        assert_eq!(m.series, "");
        assert_eq!(m.scores[1].team, "RCB Inning 1");
        assert_eq!(m.scores[1].runs, 181);
        assert_eq!(m.scores[1].overs, 19.3);
    }

    #[test]
    fn test_parse_cricapi_matches_placeholders() {
        let envelope = json!({"data": [{"name": null}]});
        let matches = parse_cricapi_matches(&envelope);
        assert_eq!(matches[0].name, DEFAULT_MATCH_NAME);
        assert_eq!(matches[0].status_text, DEFAULT_CRICAPI_STATUS);
        assert_eq!(matches[0].venue, DEFAULT_VENUE);
    }

    #[test]
    fn test_parse_cricapi_matches_lenient_score() {
        let envelope = json!({"data": [{
            "name": "GT vs RR",
            "status": "GT won by 3 runs",
            "score": [{"r": "160", "w": null, "o": "20", "inning": "GT Inning 1"}]
        }]});

        let matches = parse_cricapi_matches(&envelope);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].scores[0].runs, 160);
        assert_eq!(matches[0].scores[0].wickets, 0);
        assert_eq!(matches[0].scores[0].overs, 20.0);
    }

    #[test]
    fn test_parse_cricapi_matches_without_data() {
        assert!(parse_cricapi_matches(&json!({"status": "failure"})).is_empty());
        assert!(parse_cricapi_matches(&json!({"data": "oops"})).is_empty());
    }
}
