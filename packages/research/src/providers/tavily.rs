//! Tavily-backed research provider.
//!
//! Search asks for raw page content so hits carry a body; fetching a single
//! page goes through the extract endpoint. Requires the `tavily` feature.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::security::SecretString;
use crate::traits::provider::{PageContent, ResearchProvider, SearchResult};

pub const TAVILY_API_URL: &str = "https://api.tavily.com";

/// Tavily search and extract.
pub struct TavilyProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
    include_raw_content: bool,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
    include_raw_content: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    url: String,
    title: Option<String>,
    content: Option<String>,
    raw_content: Option<String>,
    score: Option<f32>,
}

#[derive(Serialize)]
struct ExtractRequest<'a> {
    urls: [&'a str; 1],
}

#[derive(Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    results: Vec<ExtractResult>,
}

#[derive(Deserialize)]
struct ExtractResult {
    raw_content: Option<String>,
}

impl TavilyResult {
    fn into_result(self) -> Option<SearchResult> {
        let mut result = SearchResult::from_url(&self.url)?;
        if let Some(title) = self.title {
            result = result.with_title(title);
        }
        if let Some(content) = self.content {
            result = result.with_snippet(content);
        }
        if let Some(raw) = self.raw_content.filter(|r| !r.trim().is_empty()) {
            result = result.with_body(raw);
        }
        if let Some(score) = self.score {
            result = result.with_score(score);
        }
        Some(result)
    }
}

impl TavilyProvider {
    /// Create a new Tavily provider.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: TAVILY_API_URL.to_string(),
            include_raw_content: true,
        }
    }

    /// Create from environment variable `TAVILY_API_KEY`.
    pub fn from_env() -> ProviderResult<Self> {
        SecretString::from_env("TAVILY_API_KEY")
            .map(Self::new)
            .ok_or_else(|| ProviderError::Config("TAVILY_API_KEY not set".into()))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether search hits should carry full page content (default: true).
    pub fn with_raw_content(mut self, include: bool) -> Self {
        self.include_raw_content = include;
        self
    }

    async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> ProviderResult<R> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .header("Content-Type", "application/json")
            .header("Authorization", self.api_key.bearer())
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: "tavily",
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Http(Box::new(e)))
    }
}

#[async_trait]
impl ResearchProvider for TavilyProvider {
    async fn search_raw(&self, query: &str, limit: usize) -> ProviderResult<Vec<SearchResult>> {
        let request = SearchRequest {
            query,
            max_results: limit,
            include_raw_content: self.include_raw_content,
        };

        let response: SearchResponse = self.post("/search", &request).await?;
        let results: Vec<SearchResult> = response
            .results
            .into_iter()
            .filter_map(TavilyResult::into_result)
            .collect();

        debug!(query, hits = results.len(), "Tavily search");
        Ok(results)
    }

    async fn scrape(&self, url: &str) -> ProviderResult<PageContent> {
        let request = ExtractRequest { urls: [url] };
        let response: ExtractResponse = self.post("/extract", &request).await?;

        response
            .results
            .into_iter()
            .next()
            .and_then(|r| r.raw_content)
            .filter(|body| !body.trim().is_empty())
            .map(|body| PageContent::new(url, body))
            .ok_or_else(|| ProviderError::EmptyContent {
                url: url.to_string(),
            })
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
