//! Markdown rendering of the news page.
//!
//! Mirrors the HTML layout: the lead story as a second-level heading, the
//! rest as third-level headings, then the deduplicated sources list.

use super::{PAGE_TITLE, READ_MORE, SOURCES_HEADING, UPDATED_LABEL, link_target};
use crate::controller::{Phase, UiState};
use crate::models::Article;
use std::fmt::Write;

/// Escape characters that would break inline Markdown link text.
fn escape_link_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('[', "\\[")
        .replace(']', "\\]")
}

/// Render `state` as a Markdown document.
///
/// # Arguments
///
/// * `state` - The page state to render
///
/// # Returns
///
/// The page title, followed by a loading note, the error quote, or the
/// articles and sources, depending on the phase of `state`.
pub fn render_page(state: &UiState) -> String {
    let mut md = String::new();
    writeln!(md, "# {PAGE_TITLE}\n").unwrap();

    match state.phase() {
        Phase::Loading => writeln!(md, "_ニュースを読み込み中..._").unwrap(),
        Phase::Failure => {
            writeln!(md, "> **エラー:** {}", state.error.as_deref().unwrap_or_default()).unwrap()
        }
        Phase::Success | Phase::Idle => {
            if let Some(updated_at) = state.updated_at {
                writeln!(md, "_{UPDATED_LABEL}: {}_\n", updated_at.format("%Y-%m-%d %H:%M")).unwrap();
            }
            for (index, article) in state.articles.iter().enumerate() {
                write_article(&mut md, article, index == 0);
            }

            let sources = state.unique_sources();
            if !state.articles.is_empty() && !sources.is_empty() {
                writeln!(md, "## {SOURCES_HEADING}\n").unwrap();
                for source in &sources {
                    if let (Some(uri), Some(text)) = (source.uri(), source.display_title()) {
                        let line = match link_target(uri) {
                            Some(href) => format!("- [{}](<{}>)", escape_link_text(text), href),
                            None => format!("- {text}"),
                        };
                        writeln!(md, "{line}").unwrap();
                    }
                }
            }
        }
    }

    md
}

fn write_article(md: &mut String, article: &Article, featured: bool) {
    let heading = if featured { "##" } else { "###" };
    writeln!(md, "{heading} {}\n", article.title).unwrap();
    writeln!(md, "{}\n", article.summary).unwrap();
    if let Some(href) = link_target(&article.url) {
        writeln!(md, "[{READ_MORE}](<{href}>)\n").unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CitationEntry;
    use chrono::Local;

    #[test]
    fn test_lead_story_gets_larger_heading() {
        let state = UiState {
            articles: vec![
                Article {
                    title: "リード".to_string(),
                    summary: "要約".to_string(),
                    url: "https://example.jp/1".to_string(),
                },
                Article {
                    title: "二番目".to_string(),
                    summary: "要約".to_string(),
                    url: "not a url".to_string(),
                },
            ],
            sources: vec![
                CitationEntry::web(Some("https://a.example"), Some("[A]")),
                CitationEntry::web(Some("https://b.example"), None),
            ],
            updated_at: Some(Local::now()),
            ..UiState::default()
        };
        let md = render_page(&state);

        assert!(md.contains("## リード\n"));
        assert!(md.contains("### 二番目\n"));
        assert!(md.contains("[続きを読む](<https://example.jp/1>)"));
        assert!(!md.contains("not a url>"));
        assert!(md.contains("## 参照元"));
        assert!(md.contains("- [\\[A\\]](<https://a.example>)"));
        assert!(md.contains("- [https://b.example](<https://b.example>)"));
    }

    #[test]
    fn test_failure_renders_error_quote() {
        let state = UiState {
            error: Some("ニュースの取得に失敗しました: rate limit exceeded".to_string()),
            ..UiState::default()
        };
        let md = render_page(&state);
        assert!(md.contains("> **エラー:** ニュースの取得に失敗しました"));
        assert!(!md.contains("参照元"));
    }
}
