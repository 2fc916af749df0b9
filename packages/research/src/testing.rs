//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the research library
//! without making real search, scrape or model calls.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::error::{InferenceError, InferenceResult, ProviderError, ProviderResult};
use crate::schema::OutputSchema;
use crate::traits::{
    ai::{Message, Role, AI},
    provider::{PageContent, ResearchProvider, SearchResult},
};

// =============================================================================
// Mock provider
// =============================================================================

/// Record of a call made to the mock provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockProviderCall {
    Search { query: String, limit: usize },
    Scrape { url: String },
}

/// A mock research provider.
///
/// Search results are keyed by exact query; unknown queries return no hits.
/// Pages are keyed by URL; unknown URLs fail to scrape.
#[derive(Default, Clone)]
pub struct MockProvider {
    results: Arc<RwLock<HashMap<String, Vec<SearchResult>>>>,
    pages: Arc<RwLock<HashMap<String, PageContent>>>,
    failing_queries: Arc<RwLock<HashSet<String>>>,
    calls: Arc<RwLock<Vec<MockProviderCall>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add search results for a query.
    pub fn with_results(self, query: &str, results: Vec<SearchResult>) -> Self {
        self.results
            .write()
            .unwrap()
            .insert(query.to_string(), results);
        self
    }

    /// Add URL strings as search results for a query.
    pub fn with_urls(self, query: &str, urls: &[&str]) -> Self {
        let results = urls
            .iter()
            .filter_map(|u| SearchResult::from_url(u))
            .collect();
        self.with_results(query, results)
    }

    /// Add a page that `scrape`/`fetch` will return.
    pub fn with_page(self, url: &str, body: &str) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(url.to_string(), PageContent::new(url, body));
        self
    }

    /// Make searches for `query` fail.
    pub fn with_failing_search(self, query: &str) -> Self {
        self.failing_queries
            .write()
            .unwrap()
            .insert(query.to_string());
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockProviderCall> {
        self.calls.read().unwrap().clone()
    }

    /// Queries searched, in call order.
    pub fn searched_queries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockProviderCall::Search { query, .. } => Some(query),
                MockProviderCall::Scrape { .. } => None,
            })
            .collect()
    }

    /// URLs scraped, in call order.
    pub fn scraped_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockProviderCall::Scrape { url } => Some(url),
                MockProviderCall::Search { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl ResearchProvider for MockProvider {
    async fn search_raw(&self, query: &str, limit: usize) -> ProviderResult<Vec<SearchResult>> {
        self.calls.write().unwrap().push(MockProviderCall::Search {
            query: query.to_string(),
            limit,
        });

        if self.failing_queries.read().unwrap().contains(query) {
            return Err(ProviderError::Api {
                provider: "mock",
                status: 500,
                body: format!("search failed for {}", query),
            });
        }

        Ok(self
            .results
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn scrape(&self, url: &str) -> ProviderResult<PageContent> {
        self.calls.write().unwrap().push(MockProviderCall::Scrape {
            url: url.to_string(),
        });

        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| ProviderError::Api {
                provider: "mock",
                status: 404,
                body: format!("no page for {}", url),
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// =============================================================================
// Mock AI
// =============================================================================

/// Record of a call made to the mock AI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAICall {
    Complete { system: String, user: String },
    Structured { schema: String, user: String },
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail,
}

/// A mock AI implementation for testing.
///
/// Replies are scripted by a needle matched against the user message; the
/// first registered needle that occurs wins. Unmatched completions return
/// [`MockAI::DEFAULT_COMPLETION`]; unmatched structured calls return the
/// default structured JSON if one is set, otherwise an API error.
#[derive(Default, Clone)]
pub struct MockAI {
    completions: Arc<RwLock<Vec<(String, Scripted)>>>,
    structured: Arc<RwLock<Vec<(String, Scripted)>>>,
    default_structured: Arc<RwLock<Option<String>>>,
    calls: Arc<RwLock<Vec<MockAICall>>>,
}

impl MockAI {
    pub const DEFAULT_COMPLETION: &'static str = "Mock completion";

    pub fn new() -> Self {
        Self::default()
    }

    /// Reply `response` to completions whose user message contains `needle`.
    pub fn with_completion(self, needle: &str, response: &str) -> Self {
        self.completions
            .write()
            .unwrap()
            .push((needle.to_string(), Scripted::Reply(response.to_string())));
        self
    }

    /// Fail completions whose user message contains `needle`.
    pub fn with_completion_error(self, needle: &str) -> Self {
        self.completions
            .write()
            .unwrap()
            .push((needle.to_string(), Scripted::Fail));
        self
    }

    /// Reply raw `json` to structured calls whose user message contains `needle`.
    pub fn with_structured(self, needle: &str, json: &str) -> Self {
        self.structured
            .write()
            .unwrap()
            .push((needle.to_string(), Scripted::Reply(json.to_string())));
        self
    }

    /// Fail structured calls whose user message contains `needle`.
    pub fn with_structured_error(self, needle: &str) -> Self {
        self.structured
            .write()
            .unwrap()
            .push((needle.to_string(), Scripted::Fail));
        self
    }

    /// JSON returned for structured calls no needle matched.
    pub fn with_default_structured(self, json: &str) -> Self {
        *self.default_structured.write().unwrap() = Some(json.to_string());
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockAICall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of free-text completions made.
    pub fn completion_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockAICall::Complete { .. }))
            .count()
    }

    /// Number of structured completions made.
    pub fn structured_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockAICall::Structured { .. }))
            .count()
    }

    fn lookup(script: &[(String, Scripted)], user: &str) -> Option<Scripted> {
        script
            .iter()
            .find(|(needle, _)| user.contains(needle.as_str()))
            .map(|(_, scripted)| scripted.clone())
    }
}

fn content_of(messages: &[Message], role: Role) -> String {
    messages
        .iter()
        .filter(|m| m.role == role)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl AI for MockAI {
    async fn complete(&self, messages: &[Message]) -> InferenceResult<String> {
        let user = content_of(messages, Role::User);
        self.calls.write().unwrap().push(MockAICall::Complete {
            system: content_of(messages, Role::System),
            user: user.clone(),
        });

        match Self::lookup(&self.completions.read().unwrap(), &user) {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Fail) => Err(InferenceError::Api("mock completion failure".into())),
            None => Ok(Self::DEFAULT_COMPLETION.to_string()),
        }
    }

    async fn complete_json(
        &self,
        messages: &[Message],
        schema: &OutputSchema,
    ) -> InferenceResult<String> {
        let user = content_of(messages, Role::User);
        self.calls.write().unwrap().push(MockAICall::Structured {
            schema: schema.name.clone(),
            user: user.clone(),
        });

        match Self::lookup(&self.structured.read().unwrap(), &user) {
            Some(Scripted::Reply(json)) => Ok(json),
            Some(Scripted::Fail) => Err(InferenceError::Api("mock structured failure".into())),
            None => self
                .default_structured
                .read()
                .unwrap()
                .clone()
                .ok_or_else(|| InferenceError::Api("no structured response scripted".into())),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
