//! # Subcul News
//!
//! A single page of curated Japanese subculture news (cosplay, idols, anime,
//! light novels). Each refresh asks Gemini, with Google Search grounding, for
//! ten current stories as JSON, validates the reply, and renders the result
//! as a card grid with a deduplicated list of the pages the model cited.
//!
//! ## Usage
//!
//! ```sh
//! API_KEY=... subcul_news                      # serve on 127.0.0.1:8080
//! API_KEY=... subcul_news --once -f markdown   # fetch once, print, exit
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetch**: one `generateContent` call per refresh ([`api`])
//! 2. **Parse**: strip the optional code fence and decode the article list ([`parser`])
//! 3. **State**: the [`controller`] applies the result; the [`session`] task owns it
//! 4. **Render**: HTML, Markdown or JSON from the state ([`outputs`]), served by [`server`]

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod controller;
mod error;
mod models;
mod outputs;
mod parser;
mod server;
mod session;
mod sources;
mod utils;

use api::GeminiClient;
use cli::Cli;
use config::Settings;
use controller::{Controller, Phase};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("subcul_news starting up");

    let args = Cli::parse();
    debug!(once = args.once, format = ?args.format, "Parsed CLI arguments");

    let settings = match Settings::resolve(&args) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid configuration; refusing to start");
            return Err(e.into());
        }
    };
    info!(model = %settings.model, base_url = %settings.base_url, "Configuration resolved");

    let client = GeminiClient::new(&settings)?;

    if args.once {
        let mut controller = Controller::new();
        controller.refresh(&client).await;
        let state = controller.state();

        if state.phase() == Phase::Failure {
            let message = state.error.clone().unwrap_or_default();
            error!(error = %message, "Fetch failed");
            return Err(message.into());
        }
        println!("{}", outputs::render(args.format, state)?);
        return Ok(());
    }

    let session = session::spawn_session(Arc::new(client));
    server::serve(&settings.bind, session).await
}
