//! Error types for configuration, the provider call and response parsing.
//!
//! [`ConfigError`] is fatal and only ever surfaces from startup. Everything the
//! fetch pipeline can raise is folded into [`FetchError`], whose `Display`
//! output is the message shown to the reader.

use thiserror::Error;

/// Startup configuration could not be resolved.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API_KEY environment variable not set (pass --api-key or export API_KEY)")]
    MissingApiKey,

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    InvalidFile {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid provider base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// The outbound call to the generative provider failed.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("the API key was rejected (HTTP {0})")]
    Unauthorized(u16),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider returned no candidates")]
    NoCandidates,

    #[error("response was blocked by the provider's safety filters")]
    Blocked,
}

/// The provider's text could not be read as a list of articles.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("response JSON does not match the expected article structure: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Any failure of one fetch-and-parse pass.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("ニュースの取得に失敗しました: {0}")]
    Provider(#[from] ProviderError),

    #[error("AIからの応答を解析できませんでした。形式が正しくない可能性があります。")]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_and_parse_messages_are_distinct() {
        let provider: FetchError = ProviderError::RateLimited.into();
        let bad_json = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let parse: FetchError = ParseError::Syntax(bad_json).into();

        let provider_msg = provider.to_string();
        let parse_msg = parse.to_string();
        assert!(provider_msg.starts_with("ニュースの取得に失敗しました"));
        assert!(provider_msg.contains("rate limit"));
        assert!(parse_msg.starts_with("AIからの応答を解析できませんでした"));
        assert_ne!(provider_msg, parse_msg);
    }

    #[test]
    fn test_missing_api_key_message_names_the_variable() {
        assert!(ConfigError::MissingApiKey.to_string().contains("API_KEY"));
    }
}
