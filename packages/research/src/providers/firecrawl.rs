//! Firecrawl-backed research provider.
//!
//! Search scrapes each hit to markdown in the same request, so search
//! results already carry a body. Requires the `firecrawl` feature.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::security::SecretString;
use crate::traits::provider::{PageContent, ResearchProvider, SearchResult};

pub const FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1";

const MARKDOWN: &[&str] = &["markdown"];

/// Firecrawl search and scrape.
///
/// # Example
///
/// ```rust,ignore
/// use research::providers::FirecrawlProvider;
///
/// let provider = FirecrawlProvider::from_env()?;
/// let hits = provider.search("Qdrant official site", 1).await?;
/// ```
pub struct FirecrawlProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

// Request/Response types for Firecrawl API

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    limit: usize,
    #[serde(rename = "scrapeOptions")]
    scrape_options: ScrapeOptions,
}

#[derive(Serialize)]
struct ScrapeOptions {
    formats: &'static [&'static str],
}

#[derive(Deserialize)]
struct SearchResponse {
    success: bool,
    #[serde(default)]
    data: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
    markdown: Option<String>,
    metadata: Option<PageMetadata>,
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: &'static [&'static str],
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    data: Option<ScrapeData>,
}

#[derive(Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
    metadata: Option<PageMetadata>,
}

#[derive(Deserialize)]
struct PageMetadata {
    title: Option<String>,
    #[serde(rename = "sourceURL")]
    source_url: Option<String>,
}

impl SearchHit {
    /// Hits without a parseable URL are dropped.
    fn into_result(self) -> Option<SearchResult> {
        let metadata = self.metadata;
        let url = self
            .url
            .or_else(|| metadata.as_ref().and_then(|m| m.source_url.clone()))?;

        let mut result = SearchResult::from_url(&url)?;
        if let Some(title) = self.title.or_else(|| metadata.and_then(|m| m.title)) {
            result = result.with_title(title);
        }
        if let Some(description) = self.description {
            result = result.with_snippet(description);
        }
        if let Some(markdown) = self.markdown {
            result = result.with_body(markdown);
        }
        Some(result)
    }
}

impl ScrapeData {
    fn into_page(self, url: &str) -> ProviderResult<PageContent> {
        let body = self
            .markdown
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| ProviderError::EmptyContent {
                url: url.to_string(),
            })?;

        let mut page = PageContent::new(url, body);
        if let Some(title) = self.metadata.and_then(|m| m.title) {
            page = page.with_title(title);
        }
        Ok(page)
    }
}

impl FirecrawlProvider {
    /// Create a new Firecrawl provider with the given API key.
    pub fn new(api_key: impl Into<SecretString>) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ProviderError::Http(Box::new(e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: FIRECRAWL_API_URL.to_string(),
        })
    }

    /// Create from environment variable `FIRECRAWL_API_KEY`.
    pub fn from_env() -> ProviderResult<Self> {
        let api_key = SecretString::from_env("FIRECRAWL_API_KEY")
            .ok_or_else(|| ProviderError::Config("FIRECRAWL_API_KEY not set".into()))?;
        Self::new(api_key)
    }

    /// Set a custom base URL (self-hosted Firecrawl).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the HTTP timeout (default: 120 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> ProviderResult<Self> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Http(Box::new(e)))?;
        Ok(self)
    }

    async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> ProviderResult<R> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.api_key.bearer())
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: "firecrawl",
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
impl ResearchProvider for FirecrawlProvider {
    async fn search_raw(&self, query: &str, limit: usize) -> ProviderResult<Vec<SearchResult>> {
        let request = SearchRequest {
            query,
            limit,
            scrape_options: ScrapeOptions { formats: MARKDOWN },
        };

        let response: SearchResponse = self.post("/search", &request).await?;
        if !response.success {
            return Err(ProviderError::Api {
                provider: "firecrawl",
                status: 200,
                body: format!("search unsuccessful for: {}", query),
            });
        }

        let results: Vec<SearchResult> = response
            .data
            .into_iter()
            .filter_map(SearchHit::into_result)
            .collect();

        debug!(query, hits = results.len(), "Firecrawl search");
        Ok(results)
    }

    async fn scrape(&self, url: &str) -> ProviderResult<PageContent> {
        let request = ScrapeRequest {
            url,
            formats: MARKDOWN,
        };

        let response: ScrapeResponse = self.post("/scrape", &request).await?;
        match response.data {
            Some(data) if response.success => data.into_page(url),
            _ => Err(ProviderError::EmptyContent {
                url: url.to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "firecrawl"
    }
}
