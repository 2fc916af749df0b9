//! Research provider trait: web search plus page fetching.
//!
//! The pipeline only ever asks two things of the outside web: "what pages
//! match this query" and "what does this page say". Providers (Firecrawl,
//! Tavily, mocks) implement the two raw operations; the provided `search`
//! and `fetch` methods apply the result cap and turn fetch failures into a
//! skip signal.
//!
//! ```rust,ignore
//! let hits = provider.search("Qdrant official site", 1).await?;
//! if let Some(page) = provider.fetch(hits[0].url.as_str()).await {
//!     println!("{}", page.body);
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ProviderResult;

/// One ranked hit from a web search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Source URL of the hit.
    pub url: Url,

    /// Page title, if the provider returned one.
    pub title: Option<String>,

    /// Short description or snippet.
    pub snippet: Option<String>,

    /// Page body (markdown), for providers that scrape while searching.
    pub body: Option<String>,

    /// Relevance score (0.0-1.0, if provided).
    pub score: Option<f32>,
}

impl SearchResult {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            title: None,
            snippet: None,
            body: None,
            score: None,
        }
    }

    /// Create from a URL string; `None` if it does not parse.
    pub fn from_url(url: &str) -> Option<Self> {
        Url::parse(url).ok().map(Self::new)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    /// Best available text for a placeholder description: body, then
    /// snippet, then empty.
    pub fn preview_text(&self) -> &str {
        self.body
            .as_deref()
            .or(self.snippet.as_deref())
            .unwrap_or_default()
    }
}

/// A fetched page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    pub url: String,

    /// Page body as markdown or plain text.
    pub body: String,

    pub title: Option<String>,

    pub fetched_at: DateTime<Utc>,
}

impl PageContent {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
            title: None,
            fetched_at: Utc::now(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Check if this page has content.
    pub fn has_content(&self) -> bool {
        !self.body.trim().is_empty()
    }

    /// At most `max_chars` characters of the body, cut on a char boundary.
    pub fn prefix(&self, max_chars: usize) -> &str {
        match self.body.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.body[..idx],
            None => &self.body,
        }
    }
}

/// Search and fetch capability used by every pipeline stage.
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    /// Run a web search. Implementations should request at most `limit` hits.
    async fn search_raw(&self, query: &str, limit: usize) -> ProviderResult<Vec<SearchResult>>;

    /// Fetch one page's content.
    async fn scrape(&self, url: &str) -> ProviderResult<PageContent>;

    /// Search, returning at most `limit` hits in provider rank order.
    async fn search(&self, query: &str, limit: usize) -> ProviderResult<Vec<SearchResult>> {
        let mut results = self.search_raw(query, limit).await?;
        results.truncate(limit);
        Ok(results)
    }

    /// Fetch a page, or `None` when it is unreachable or empty.
    ///
    /// Callers treat `None` as "skip", never as a fatal error.
    async fn fetch(&self, url: &str) -> Option<PageContent> {
        if url.trim().is_empty() {
            return None;
        }

        match self.scrape(url).await {
            Ok(page) if page.has_content() => Some(page),
            Ok(_) => {
                tracing::warn!(url, provider = self.name(), "Fetched page has no content");
                None
            }
            Err(e) => {
                tracing::warn!(url, provider = self.name(), error = %e, "Failed to fetch page");
                None
            }
        }
    }

    /// Provider name (for logging).
    fn name(&self) -> &str {
        "unknown"
    }
}
