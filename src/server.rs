//! HTTP surface of the page.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /` | Rendered page for the current state |
//! | `POST /refresh` | Trigger a new fetch, then redirect back to `/` |
//! | `GET /api/news` | Current state as JSON |

use crate::outputs::{html, json::PageView};
use crate::session::SessionHandle;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::error::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

/// Build the page's routes over a running session.
pub fn router(session: SessionHandle) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/refresh", post(refresh))
        .route("/api/news", get(news))
        .layer(TraceLayer::new_for_http())
        .with_state(session)
}

/// Bind `addr` and serve until the process is stopped.
#[instrument(level = "info", skip(session))]
pub async fn serve(addr: &str, session: SessionHandle) -> Result<(), Box<dyn Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Serving news page");
    axum::serve(listener, router(session)).await?;
    Ok(())
}

async fn page(State(session): State<SessionHandle>) -> Html<String> {
    Html(html::render_page(&session.snapshot()))
}

async fn refresh(State(session): State<SessionHandle>) -> impl IntoResponse {
    session.refresh();
    Redirect::to("/")
}

async fn news(State(session): State<SessionHandle>) -> Response {
    let state = session.snapshot();
    Json(PageView::from(&state)).into_response()
}
