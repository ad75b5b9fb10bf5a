//! プロンプト生成モジュール
//!
//! 試合フィード用の固定プロンプト。応答は `parser::parse_generated_matches` で読む。

/// live / upcoming 試合一覧を要求するプロンプト
pub const MATCH_FEED_PROMPT: &str = r#"Provide only JSON output for the latest live and upcoming cricket matches.
The JSON format must be:
{
    "matches": [
        {
            "name": "Match Name",
            "teams": ["Team 1", "Team 2"],
            "venue": "Venue Name",
            "status": "Live / Upcoming",
            "scores": [
                {"team": "Team 1", "runs": 120, "wickets": 3, "overs": 15.2},
                {"team": "Team 2", "runs": 0, "wickets": 0, "overs": 0}
            ]
        }
    ]
}
**Return only JSON. Do not add any extra text, explanation, or markdown formatting.**"#;

/// 試合フィード用プロンプト
pub fn build_match_feed_prompt() -> String {
    MATCH_FEED_PROMPT.to_string()
}
