//! Gemini API interaction with Google Search grounding.
//!
//! This module sends the fixed news prompt to the Gemini `generateContent`
//! endpoint with the `google_search` tool enabled, and returns the raw reply
//! text together with the grounding citations the provider attached.
//!
//! # Architecture
//!
//! - [`NewsProvider`]: Core trait describing one round-trip to the provider
//! - [`GeminiClient`]: The real implementation over `reqwest`
//! - [`fetch_news`]: The fetch-and-parse pipeline used by the controller
//!
//! No retry and no request timeout are configured; a failed call is reported
//! once and recovery is left to the reader pressing refresh.

use crate::config::Settings;
use crate::error::{FetchError, ProviderError};
use crate::models::{CitationEntry, FetchOutcome};
use crate::parser::parse_articles;
use crate::utils::truncate_for_log;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// The instruction sent on every fetch.
///
/// Asks for the ten latest major Japanese news items on cosplay, idols,
/// anime and light novels, as a fenced JSON array of `title`/`summary`/`url`.
pub const PROMPT: &str = r#"コスプレ、アイドル、アニメ、ライトノベルに関する日本の最新の主要なニュースを10件、以下のJSON配列の形式で返してください。各項目にはタイトル、短い要約、元の記事へのURLを含めてください。マークダウンの ```json ... ``` ブロックで囲んでください。

[
  {
    "title": "ニュースのタイトル",
    "summary": "ニュースの要約（150文字程度）",
    "url": "https://example.com/news-article-1"
  },
  {
    "title": "別のニュースのタイトル",
    "summary": "別のニュースの要約（150文字程度）",
    "url": "https://example.com/news-article-2"
  }
]
"#;

/// Header carrying the API key, so the key never appears in a request URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// The provider's reply, untransformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderResponse {
    /// Concatenated text of the first candidate.
    pub text: String,
    /// Grounding citations of the first candidate, verbatim.
    pub sources: Vec<CitationEntry>,
}

/// One round-trip to a generative provider.
///
/// Implementors issue exactly one outbound call per invocation. The returned
/// future is `Send` so fetches can run as spawned tasks.
pub trait NewsProvider {
    fn generate(&self) -> impl Future<Output = Result<ProviderResponse, ProviderError>> + Send;
}

/// Run one fetch: call the provider, then parse its text into articles.
///
/// Either both articles and sources are returned or the whole fetch fails.
#[instrument(level = "info", skip_all)]
pub async fn fetch_news<P>(provider: &P) -> Result<FetchOutcome, FetchError>
where
    P: NewsProvider,
{
    let t0 = Instant::now();
    let response = provider.generate().await.inspect_err(|e| {
        error!(elapsed_ms = t0.elapsed().as_millis(), error = %e, "Provider call failed");
    })?;
    let articles = parse_articles(&response.text)?;

    info!(
        elapsed_ms = t0.elapsed().as_millis(),
        article_count = articles.len(),
        source_count = response.sources.len(),
        "Fetched news"
    );
    Ok(FetchOutcome {
        articles,
        sources: response.sources,
    })
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<CitationEntry>,
}

impl GenerateResponse {
    fn into_provider_response(self) -> Result<ProviderResponse, ProviderError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(ProviderError::NoCandidates)?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(ProviderError::Blocked);
        }

        let text = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        let sources = candidate
            .grounding_metadata
            .map(|g| g.grounding_chunks)
            .unwrap_or_default();

        Ok(ProviderResponse { text, sources })
    }
}

/// Gemini REST client.
///
/// Holds the API key and model from [`Settings`]; every call to
/// [`NewsProvider::generate`] sends [`PROMPT`] with search grounding on.
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(settings: &Settings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().build()?;
        let endpoint = format!(
            "{}/models/{}:generateContent",
            settings.base_url.as_str().trim_end_matches('/'),
            urlencoding::encode(&settings.model)
        );

        Ok(Self {
            client,
            endpoint,
            api_key: settings.api_key.clone(),
        })
    }
}

impl NewsProvider for GeminiClient {
    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint))]
    async fn generate(&self) -> Result<ProviderResponse, ProviderError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: PROMPT }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        };

        let t0 = Instant::now();
        let resp = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                elapsed_ms = t0.elapsed().as_millis(),
                body = %truncate_for_log(&body, 300),
                "Gemini returned an error status"
            );
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Unauthorized(status.as_u16()),
                429 => ProviderError::RateLimited,
                code => ProviderError::Status {
                    status: code,
                    body: truncate_for_log(&body, 200),
                },
            });
        }

        let response: GenerateResponse = resp.json().await?;
        let response = response.into_provider_response()?;
        info!(
            elapsed_ms = t0.elapsed().as_millis(),
            bytes = response.text.len(),
            source_count = response.sources.len(),
            "Gemini call succeeded"
        );
        Ok(response)
    }
}
