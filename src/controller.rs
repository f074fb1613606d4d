//! The page state and the only code allowed to change it.
//!
//! A [`Controller`] owns the single [`UiState`] of a session. A refresh is
//! split in two synchronous halves around the network call:
//! [`Controller::begin_refresh`] clears the previous content and hands out a
//! [`RefreshTicket`], and [`Controller::settle`] applies the fetch result.
//!
//! Tickets are generations. Only the ticket from the most recent
//! `begin_refresh` is applied; a fetch that settles after a newer refresh was
//! triggered is discarded, so stale content never reappears.

use crate::api::{NewsProvider, fetch_news};
use crate::error::FetchError;
use crate::models::{Article, CitationEntry, FetchOutcome};
use crate::sources::dedupe_sources;
use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Everything the page renders from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UiState {
    /// Articles of the last successful fetch, lead story first.
    pub articles: Vec<Article>,
    /// Citations of the last successful fetch, as returned by the provider.
    pub sources: Vec<CitationEntry>,
    pub is_loading: bool,
    /// Reader-facing message of the last failed fetch.
    pub error: Option<String>,
    /// When the last successful fetch settled.
    pub updated_at: Option<DateTime<Local>>,
}

/// Which of the mutually exclusive phases the state is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Failure,
}

impl UiState {
    /// Derive the current [`Phase`].
    ///
    /// Loading takes precedence over everything else, then a recorded error.
    /// A state that has settled successfully at least once is `Success`, even
    /// when the fetch returned no articles.
    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Failure
        } else if self.updated_at.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    /// Citations collapsed to one per URI, ready to render.
    pub fn unique_sources(&self) -> Vec<CitationEntry> {
        dedupe_sources(&self.sources)
    }
}

/// Identifies one triggered refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    /// The refresh counter value this ticket was issued for, starting at 1.
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Owner of a session's [`UiState`].
///
/// All transitions go through [`Controller::begin_refresh`] and
/// [`Controller::settle`]; [`Controller::refresh`] chains the two around a
/// single fetch for callers that do not need to interleave refreshes.
#[derive(Debug, Default)]
pub struct Controller {
    state: UiState,
    generation: u64,
}

impl Controller {
    /// Create a controller in the `Idle` phase with no refresh issued yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state, for rendering.
    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Enter `Loading`, dropping any previous articles, sources and error.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.state = UiState {
            is_loading: true,
            ..UiState::default()
        };
        info!(ticket = self.generation, "Refresh triggered");
        RefreshTicket(self.generation)
    }

    /// Apply the result of the fetch started with `ticket`.
    ///
    /// Returns `false` without touching the state when `ticket` has been
    /// superseded by a newer refresh.
    pub fn settle(
        &mut self,
        ticket: RefreshTicket,
        result: Result<FetchOutcome, FetchError>,
    ) -> bool {
        if ticket.0 != self.generation {
            warn!(
                ticket = ticket.0,
                current = self.generation,
                "Discarding result of superseded refresh"
            );
            return false;
        }

        self.state = match result {
            Ok(outcome) => {
                info!(
                    ticket = ticket.0,
                    article_count = outcome.articles.len(),
                    source_count = outcome.sources.len(),
                    "Refresh succeeded"
                );
                UiState {
                    articles: outcome.articles,
                    sources: outcome.sources,
                    is_loading: false,
                    error: None,
                    updated_at: Some(Local::now()),
                }
            }
            Err(e) => {
                warn!(ticket = ticket.0, error = %e, "Refresh failed");
                UiState {
                    error: Some(e.to_string()),
                    ..UiState::default()
                }
            }
        };
        true
    }

    /// Run a full refresh in place: begin, fetch, settle.
    #[instrument(level = "info", skip_all)]
    pub async fn refresh<P: NewsProvider>(&mut self, provider: &P) {
        let ticket = self.begin_refresh();
        let result = fetch_news(provider).await;
        self.settle(ticket, result);
    }
}
