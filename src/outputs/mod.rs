//! Rendering of the page state for display.
//!
//! All renderers are pure functions of [`UiState`]:
//!
//! - [`html`]: The served page (card grid, loading indicator, error banner, sources)
//! - [`markdown`]: A plain-text rendering for `--once --format markdown`
//! - [`json`]: The `/api/news` payload and `--once --format json`
//!
//! Article and citation URLs come from the model and are untrusted. They are
//! only emitted as links when they parse as `http`/`https` URLs.

pub mod html;
pub mod json;
pub mod markdown;

use crate::cli::OutputFormat;
use crate::controller::UiState;
use url::Url;

pub const PAGE_TITLE: &str = "AIサブカルニュース";
pub const SOURCES_HEADING: &str = "参照元";
pub const READ_MORE: &str = "続きを読む";
pub const UPDATED_LABEL: &str = "最終更新";

/// Render `state` in the requested format.
pub fn render(format: OutputFormat, state: &UiState) -> Result<String, serde_json::Error> {
    Ok(match format {
        OutputFormat::Html => html::render_page(state),
        OutputFormat::Markdown => markdown::render_page(state),
        OutputFormat::Json => json::render_page(state)?,
    })
}

/// Return `raw` if it is an absolute `http`/`https` URL, `None` otherwise.
pub fn link_target(raw: &str) -> Option<&str> {
    let parsed = Url::parse(raw.trim()).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(raw.trim())
}
