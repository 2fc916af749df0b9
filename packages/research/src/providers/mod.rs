//! Research provider implementations.
//!
//! - `FirecrawlProvider` - Firecrawl search + scrape (`firecrawl` feature)
//! - `TavilyProvider` - Tavily search + extract (`tavily` feature)
//! - [`MockProvider`](crate::testing::MockProvider) - For testing

#[cfg(feature = "firecrawl")]
pub mod firecrawl;

#[cfg(feature = "tavily")]
pub mod tavily;

#[cfg(feature = "firecrawl")]
pub use firecrawl::FirecrawlProvider;

#[cfg(feature = "tavily")]
pub use tavily::TavilyProvider;
