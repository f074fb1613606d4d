//! Data models for curated news items and their grounding citations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: One news item as emitted by the model
//! - [`CitationEntry`] / [`WebCitation`]: Grounding citations returned by the provider
//! - [`FetchOutcome`]: Everything a single successful fetch produces
//!
//! Citation types mirror the provider's camelCase wire format, where every
//! field is optional.

use serde::{Deserialize, Serialize};

/// A single news item as returned by the model.
///
/// All three fields are required when decoding; a response element that
/// lacks any of them (or carries a non-string value) rejects the whole
/// response. Unknown extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// The headline.
    pub title: String,
    /// A short summary (the prompt asks for roughly 150 characters).
    pub summary: String,
    /// Link to the original article.
    pub url: String,
}

/// A grounding citation attached to the provider's response.
///
/// A citation without a `web.uri` carries no usable reference and is dropped
/// by [`crate::sources::dedupe_sources`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CitationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebCitation>,
}

/// The web page behind a grounding citation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WebCitation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl CitationEntry {
    /// Build a citation from an optional URI and title.
    #[cfg(test)]
    pub fn web(uri: Option<&str>, title: Option<&str>) -> Self {
        Self {
            web: Some(WebCitation {
                uri: uri.map(str::to_string),
                title: title.map(str::to_string),
            }),
        }
    }

    /// The cited URI, if the citation carries one.
    pub fn uri(&self) -> Option<&str> {
        self.web.as_ref().and_then(|w| w.uri.as_deref())
    }

    /// Text to show for this citation: its title, or the URI when untitled.
    pub fn display_title(&self) -> Option<&str> {
        let web = self.web.as_ref()?;
        web.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(web.uri.as_deref())
    }
}

/// The atomic result of one fetch: either fully populated or the fetch failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchOutcome {
    /// Articles in the order the model emitted them; index 0 is the lead story.
    pub articles: Vec<Article>,
    /// Grounding citations exactly as the provider returned them.
    pub sources: Vec<CitationEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_deserializes_provider_shape() {
        let json = r#"[
            {"web": {"uri": "https://example.jp/a", "title": "example.jp"}},
            {"web": {"uri": "https://example.jp/b"}},
            {"web": {}},
            {}
        ]"#;
        let citations: Vec<CitationEntry> = serde_json::from_str(json).unwrap();

        assert_eq!(citations.len(), 4);
        assert_eq!(citations[0].uri(), Some("https://example.jp/a"));
        assert_eq!(citations[1].uri(), Some("https://example.jp/b"));
        assert_eq!(citations[2].uri(), None);
        assert!(citations[3].web.is_none());
    }

    #[test]
    fn test_display_title_falls_back_to_uri() {
        let titled = CitationEntry::web(Some("https://a.example"), Some("A"));
        let untitled = CitationEntry::web(Some("https://b.example"), None);
        let blank = CitationEntry::web(Some("https://c.example"), Some(""));

        assert_eq!(titled.display_title(), Some("A"));
        assert_eq!(untitled.display_title(), Some("https://b.example"));
        assert_eq!(blank.display_title(), Some("https://c.example"));
        assert_eq!(CitationEntry::default().display_title(), None);
    }

    #[test]
    fn test_citation_serialization_omits_absent_fields() {
        let citation = CitationEntry::web(Some("b"), None);
        let json = serde_json::to_string(&citation).unwrap();
        assert_eq!(json, r#"{"web":{"uri":"b"}}"#);
    }

    #[test]
    fn test_article_ignores_unknown_fields() {
        let json = r#"{"title": "T", "summary": "S", "url": "U", "imageUrl": "I"}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "T");
        assert_eq!(article.summary, "S");
        assert_eq!(article.url, "U");
    }
}
