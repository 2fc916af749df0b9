//! Typed errors for the research library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell a
//! provider failure from an inference failure without string matching.

use thiserror::Error;

/// Errors from the search/scrape provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed (connection, timeout, body decode)
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Provider answered with a non-success status or `success: false`
    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// URL could not be parsed or is empty
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Page was fetched but carried no usable body
    #[error("no content returned for: {url}")]
    EmptyContent { url: String },

    /// Provider misconfigured (missing key, bad client settings)
    #[error("config error: {0}")]
    Config(String),
}

/// Errors from the language-model provider.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Configuration error (missing API key, invalid settings)
    #[error("config error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rate limit, invalid request)
    #[error("API error: {0}")]
    Api(String),

    /// The model returned no choices or an empty message
    #[error("empty response from model")]
    EmptyResponse,

    /// Structured response did not satisfy the requested schema
    #[error("structured output for {type_name} failed validation: {reason}")]
    StructuredOutput { type_name: String, reason: String },
}

/// Errors surfaced by [`ResearchWorkflow::run`](crate::pipeline::ResearchWorkflow::run).
///
/// Discovery and enrichment degrade into data instead of failing, so the
/// only way a run fails is synthesis.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// The synthesis completion failed
    #[error("synthesis failed: {0}")]
    Synthesis(#[source] InferenceError),

    /// Company records could not be serialized for the synthesis prompt
    #[error("failed to serialize companies: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A failure inside a stage that degrades instead of propagating.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Result type alias for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Result type alias for inference operations.
pub type InferenceResult<T> = std::result::Result<T, InferenceError>;

/// Result type alias for a research run.
pub type Result<T> = std::result::Result<T, ResearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_names_provider() {
        let err = ProviderError::Api {
            provider: "firecrawl",
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "firecrawl API error (429): rate limited");
    }

    #[test]
    fn test_synthesis_error_keeps_source() {
        use std::error::Error as _;

        let err = ResearchError::Synthesis(InferenceError::EmptyResponse);
        assert!(err.to_string().starts_with("synthesis failed"));
        assert!(err.source().is_some());
    }
}
