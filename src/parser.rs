//! Decoding the model's loosely structured reply into [`Article`]s.
//!
//! The prompt asks for a bare JSON array, optionally wrapped in a
//! ```` ```json ... ``` ```` fence. Nothing beyond that wrapper is repaired:
//! the reply is untrusted input and anything that does not decode cleanly is
//! rejected as a whole.

use crate::error::ParseError;
use crate::models::Article;
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::error::Category;
use tracing::{debug, instrument, warn};

/// A leading ```` ```json ```` opener plus the whitespace after it.
static FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```json\s*").unwrap());

/// Remove the markdown fence the model sometimes wraps around its JSON.
///
/// Only a fence at the very start and end of the (trimmed) text is removed.
pub fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let start = FENCE_OPEN.find(trimmed).map_or(0, |m| m.end());
    let body = &trimmed[start..];
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse the model's reply into an ordered list of articles.
///
/// Decoding and validation happen in one step: the reply must be a JSON
/// array whose every element is an object with string `title`, `summary`
/// and `url` fields. Order is preserved.
///
/// This is stricter than a presence check: a field that is present but
/// `null`, a number or an object rejects the whole reply as well. The
/// renderers can then rely on every article carrying three strings.
///
/// # Errors
///
/// - [`ParseError::Syntax`] when the unwrapped text is not valid JSON
/// - [`ParseError::Shape`] when it is valid JSON of the wrong shape
#[instrument(level = "info", skip_all, fields(bytes = raw.len()))]
pub fn parse_articles(raw: &str) -> Result<Vec<Article>, ParseError> {
    let json = strip_fence(raw);

    match serde_json::from_str::<Vec<Article>>(json) {
        Ok(articles) => {
            debug!(article_count = articles.len(), "Parsed articles");
            Ok(articles)
        }
        Err(e) => {
            warn!(
                error = %e,
                response_preview = %truncate_for_log(raw, 300),
                "Model returned non-conforming JSON"
            );
            Err(match e.classify() {
                Category::Data => ParseError::Shape(e),
                Category::Syntax | Category::Eof | Category::Io => ParseError::Syntax(e),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: &str = r#"[
        {"title": "コミケ開催", "summary": "夏のコミックマーケットが開幕。", "url": "https://example.jp/1"},
        {"title": "新作アニメ", "summary": "秋アニメのラインナップ発表。", "url": "https://example.jp/2"},
        {"title": "ラノベ大賞", "summary": "受賞作が決定。", "url": "https://example.jp/3"}
    ]"#;

    #[test]
    fn test_parse_fenced_single_article() {
        let raw = "```json\n[{\"title\":\"T\",\"summary\":\"S\",\"url\":\"U\"}]\n```";
        let articles = parse_articles(raw).unwrap();
        assert_eq!(
            articles,
            vec![Article {
                title: "T".to_string(),
                summary: "S".to_string(),
                url: "U".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_preserves_length_and_order() {
        let articles = parse_articles(BARE).unwrap();
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].title, "コミケ開催");
        assert_eq!(articles[1].url, "https://example.jp/2");
        assert_eq!(articles[2].summary, "受賞作が決定。");
    }

    #[test]
    fn test_fenced_and_bare_parse_identically() {
        let fenced = format!("```json\n{}\n```", BARE);
        assert_eq!(parse_articles(&fenced).unwrap(), parse_articles(BARE).unwrap());
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let fenced = format!("\n\n  ```json{}```  \n", BARE);
        assert_eq!(parse_articles(&fenced).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_articles("[]").unwrap().is_empty());
        assert!(parse_articles("```json\n[]\n```").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_syntax_error() {
        let err = parse_articles("ニュースは見つかりませんでした。").unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));

        let truncated = r#"[{"title": "T", "summary": "S", "url": "#;
        assert!(matches!(
            parse_articles(truncated).unwrap_err(),
            ParseError::Syntax(_)
        ));
    }

    #[test]
    fn test_missing_field_rejects_whole_response() {
        let raw = r#"[
            {"title": "T1", "summary": "S1", "url": "U1"},
            {"title": "T2", "summary": "S2"}
        ]"#;
        assert!(matches!(parse_articles(raw).unwrap_err(), ParseError::Shape(_)));
    }

    #[test]
    fn test_non_array_is_shape_error() {
        let raw = r#"{"title": "T", "summary": "S", "url": "U"}"#;
        assert!(matches!(parse_articles(raw).unwrap_err(), ParseError::Shape(_)));
    }

    #[test]
    fn test_non_string_field_is_shape_error() {
        let raw = r#"[{"title": null, "summary": "S", "url": "U"}]"#;
        assert!(matches!(parse_articles(raw).unwrap_err(), ParseError::Shape(_)));

        let raw = r#"["just a string"]"#;
        assert!(matches!(parse_articles(raw).unwrap_err(), ParseError::Shape(_)));
    }

    #[test]
    fn test_prose_around_fence_is_not_repaired() {
        let raw = format!("Here you go:\n```json\n{}\n```", BARE);
        assert!(parse_articles(&raw).is_err());
    }

    #[test]
    fn test_strip_fence_only_touches_edges() {
        assert_eq!(strip_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_fence("[1]"), "[1]");
        assert_eq!(strip_fence("  [\"```\"]  "), "[\"```\"]");
    }
}
