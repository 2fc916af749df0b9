//! Runtime choice between the concrete research providers.

use async_trait::async_trait;
use research::{
    error::ProviderResult,
    providers::{FirecrawlProvider, TavilyProvider},
    PageContent, ResearchProvider, SearchResult,
};

pub enum AnyProvider {
    Firecrawl(FirecrawlProvider),
    Tavily(TavilyProvider),
}

#[async_trait]
impl ResearchProvider for AnyProvider {
    async fn search_raw(&self, query: &str, limit: usize) -> ProviderResult<Vec<SearchResult>> {
        match self {
            Self::Firecrawl(p) => p.search_raw(query, limit).await,
            Self::Tavily(p) => p.search_raw(query, limit).await,
        }
    }

    async fn scrape(&self, url: &str) -> ProviderResult<PageContent> {
        match self {
            Self::Firecrawl(p) => p.scrape(url).await,
            Self::Tavily(p) => p.scrape(url).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Firecrawl(p) => p.name(),
            Self::Tavily(p) => p.name(),
        }
    }
}
