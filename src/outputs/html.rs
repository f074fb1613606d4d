//! HTML rendering of the news page.
//!
//! # Layout
//!
//! ```text
//! header: title + refresh button (POST /refresh)
//! main:   loading indicator | error banner | card grid + sources
//! ```
//!
//! The first article gets the `featured` card, spanning two columns and two
//! rows on wide screens. While a fetch is in flight the page reloads itself
//! every few seconds until the result is in.

use super::{PAGE_TITLE, READ_MORE, SOURCES_HEADING, UPDATED_LABEL, link_target};
use crate::controller::{Phase, UiState};
use crate::models::{Article, CitationEntry};
use itertools::Itertools;

const LOADING_RELOAD_SECS: u32 = 3;

const STYLE: &str = r#"
body { margin: 0; background: #f8fafc; font-family: system-ui, sans-serif; color: #1e293b; }
header { position: sticky; top: 0; background: rgba(255,255,255,.85); box-shadow: 0 1px 2px rgba(0,0,0,.06); }
.bar { max-width: 80rem; margin: 0 auto; padding: 1rem 2rem; display: flex; justify-content: space-between; align-items: center; }
h1 { font-size: 1.5rem; margin: 0; }
button { padding: .5rem 1rem; border: 0; border-radius: .375rem; background: #2563eb; color: #fff; cursor: pointer; }
button:disabled { background: #94a3b8; cursor: not-allowed; }
main { max-width: 80rem; margin: 0 auto; padding: 2rem; }
.updated { color: #64748b; font-size: .8rem; margin: 0 0 1rem; }
.grid { display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); grid-auto-rows: 1fr; }
.card { background: #fff; border-radius: .75rem; box-shadow: 0 4px 6px rgba(0,0,0,.08); padding: 1.5rem; display: flex; flex-direction: column; }
.card h3 { margin: 0 0 .5rem; font-size: 1.1rem; }
.card p { flex-grow: 1; color: #475569; font-size: .9rem; line-height: 1.6; }
.card.featured { grid-column: span 2; grid-row: span 2; }
.card.featured h3 { font-size: 1.6rem; }
.card.featured p { font-size: 1rem; }
.card a { color: #2563eb; text-decoration: none; font-size: .9rem; }
.loading { text-align: center; padding: 4rem; color: #64748b; }
.error { background: #fef2f2; border: 1px solid #fecaca; color: #b91c1c; padding: 1rem; border-radius: .5rem; }
.sources { margin-top: 3rem; padding-top: 1.5rem; border-top: 1px solid #e2e8f0; }
.sources li { font-size: .9rem; margin: .4rem 0; word-break: break-all; }
.sources a { color: #2563eb; }
"#;

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render the full page for `state`.
pub fn render_page(state: &UiState) -> String {
    let phase = state.phase();
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    if phase == Phase::Loading {
        html.push_str(&format!(
            "<meta http-equiv=\"refresh\" content=\"{LOADING_RELOAD_SECS}\">\n"
        ));
    }
    html.push_str(&format!("<title>{}</title>\n", escape_html(PAGE_TITLE)));
    html.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));

    html.push_str(&render_header(phase == Phase::Loading));

    html.push_str("<main>\n");
    match phase {
        Phase::Loading => {
            html.push_str("<div class=\"loading\" role=\"status\">ニュースを読み込み中...</div>\n");
        }
        Phase::Failure => {
            let message = state.error.as_deref().unwrap_or_default();
            html.push_str(&format!(
                "<div class=\"error\" role=\"alert\"><strong>エラー:</strong> {}</div>\n",
                escape_html(message)
            ));
        }
        Phase::Success | Phase::Idle => html.push_str(&render_results(state)),
    }
    html.push_str("</main>\n</body>\n</html>\n");

    html
}

fn render_header(loading: bool) -> String {
    let (disabled, label) = if loading {
        (" disabled", "更新中...")
    } else {
        ("", "更新")
    };
    format!(
        "<header><div class=\"bar\">\n<h1>{}</h1>\n\
         <form method=\"post\" action=\"/refresh\"><button type=\"submit\"{disabled}>{label}</button></form>\n\
         </div></header>\n",
        escape_html(PAGE_TITLE)
    )
}

fn render_results(state: &UiState) -> String {
    if state.articles.is_empty() {
        return String::new();
    }

    let mut html = String::new();
    if let Some(updated_at) = state.updated_at {
        html.push_str(&format!(
            "<p class=\"updated\">{UPDATED_LABEL}: {}</p>\n",
            updated_at.format("%Y-%m-%d %H:%M")
        ));
    }

    let cards = state
        .articles
        .iter()
        .enumerate()
        .map(|(index, article)| render_card(article, index == 0))
        .join("\n");
    html.push_str(&format!("<div class=\"grid\">\n{cards}\n</div>\n"));

    let sources = state.unique_sources();
    if !sources.is_empty() {
        html.push_str(&render_sources(&sources));
    }
    html
}

fn render_card(article: &Article, featured: bool) -> String {
    let class = if featured { "card featured" } else { "card" };
    let href = link_target(&article.url).unwrap_or("#");
    format!(
        "<article class=\"{class}\">\n<h3>{}</h3>\n<p>{}</p>\n\
         <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{READ_MORE} &rarr;</a>\n</article>",
        escape_html(&article.title),
        escape_html(&article.summary),
        escape_html(href)
    )
}

fn render_sources(sources: &[CitationEntry]) -> String {
    let items = sources
        .iter()
        .filter_map(|source| {
            let uri = source.uri()?;
            let text = source.display_title().unwrap_or(uri);
            Some(format!(
                "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></li>",
                escape_html(link_target(uri).unwrap_or("#")),
                escape_html(text)
            ))
        })
        .join("\n");
    format!(
        "<section class=\"sources\">\n<h2>{SOURCES_HEADING}</h2>\n<ul>\n{items}\n</ul>\n</section>\n"
    )
}
