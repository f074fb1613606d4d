//! JSON rendering of the page state for API consumers.
//!
//! Unlike [`UiState`] itself, the payload carries the sources already
//! deduplicated, which is what a client would render.

use crate::controller::UiState;
use crate::models::{Article, CitationEntry};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Serializable view of a [`UiState`] with sources deduplicated.
#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    pub articles: &'a [Article],
    pub sources: Vec<CitationEntry>,
    pub is_loading: bool,
    pub error: Option<&'a str>,
    pub updated_at: Option<DateTime<Local>>,
}

impl<'a> From<&'a UiState> for PageView<'a> {
    fn from(state: &'a UiState) -> Self {
        Self {
            articles: &state.articles,
            sources: state.unique_sources(),
            is_loading: state.is_loading,
            error: state.error.as_deref(),
            updated_at: state.updated_at,
        }
    }
}

/// Render `state` as pretty-printed JSON.
///
/// # Arguments
///
/// * `state` - The page state to render
///
/// # Returns
///
/// The [`PageView`] of `state` as a JSON document.
///
/// # Errors
///
/// Returns the `serde_json` error if serialization fails.
pub fn render_page(state: &UiState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&PageView::from(state))
}
