//! Command-line interface definitions for Subcul News.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Most options can also be provided via environment variables.

use clap::{Parser, ValueEnum};

/// Command-line arguments for the Subcul News application.
///
/// # Examples
///
/// ```sh
/// # Serve the page on the default address
/// API_KEY=... subcul_news
///
/// # Serve on all interfaces with a different model
/// subcul_news --bind 0.0.0.0:8080 --model gemini-2.5-pro
///
/// # Fetch once and print Markdown
/// subcul_news --once --format markdown
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Gemini API key
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model identifier [default: gemini-2.5-flash]
    #[arg(short, long, env = "GEMINI_MODEL")]
    pub model: Option<String>,

    /// Base URL of the Gemini REST API
    #[arg(long, env = "GEMINI_BASE_URL")]
    pub base_url: Option<String>,

    /// Address the web page is served on [default: 127.0.0.1:8080]
    #[arg(short, long, env = "SUBCUL_NEWS_BIND")]
    pub bind: Option<String>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Fetch once, print the rendered page to stdout and exit
    #[arg(long)]
    pub once: bool,

    /// Output format for --once
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,
}

/// Rendering used by `--once`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Markdown,
    Json,
}
