//! Configuration for the research workflow.

use serde::{Deserialize, Serialize};

/// Tunables for the three pipeline stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Appended to the user query for the discovery search.
    ///
    /// Default: "tools comparison best alternatives".
    pub discovery_qualifier: String,

    /// Max articles fetched during discovery. Default: 3.
    pub discovery_limit: usize,

    /// Characters of each discovery article sent to the model. Default: 1500.
    pub content_prefix_chars: usize,

    /// Max extracted tool names researched. Default: 4.
    pub max_targets: usize,

    /// Max results of the direct-search fallback used when discovery found
    /// no tools. Default: 3.
    pub fallback_limit: usize,

    /// Results requested per official-site lookup. Default: 1.
    pub official_site_limit: usize,

    /// Appended to a tool name for the official-site lookup.
    ///
    /// Default: "official site".
    pub official_site_suffix: String,

    /// Name used for fallback hits that carry no title. Default: "Unknown Tool".
    pub unknown_tool_name: String,

    /// Targets enriched concurrently. 1 keeps enrichment sequential.
    ///
    /// Results are always stored in target order. Default: 1.
    pub enrichment_concurrency: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            discovery_qualifier: "tools comparison best alternatives".to_string(),
            discovery_limit: 3,
            content_prefix_chars: 1500,
            max_targets: 4,
            fallback_limit: 3,
            official_site_limit: 1,
            official_site_suffix: "official site".to_string(),
            unknown_tool_name: "Unknown Tool".to_string(),
            enrichment_concurrency: 1,
        }
    }
}

impl WorkflowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the discovery article limit.
    pub fn with_discovery_limit(mut self, limit: usize) -> Self {
        self.discovery_limit = limit;
        self
    }

    /// Set the per-article content prefix length.
    pub fn with_content_prefix_chars(mut self, chars: usize) -> Self {
        self.content_prefix_chars = chars;
        self
    }

    /// Set the max number of researched tools.
    pub fn with_max_targets(mut self, max: usize) -> Self {
        self.max_targets = max;
        self
    }

    /// Set the fallback search limit.
    pub fn with_fallback_limit(mut self, limit: usize) -> Self {
        self.fallback_limit = limit;
        self
    }

    /// Set enrichment concurrency (clamped to at least 1).
    pub fn with_enrichment_concurrency(mut self, concurrency: usize) -> Self {
        self.enrichment_concurrency = concurrency.max(1);
        self
    }

    /// The discovery search query for a user query.
    pub fn discovery_query(&self, query: &str) -> String {
        format!("{} {}", query, self.discovery_qualifier)
    }

    /// The official-site lookup query for a tool name.
    pub fn official_site_query(&self, name: &str) -> String {
        format!("{} {}", name, self.official_site_suffix)
    }

    /// Concurrency actually used, never zero.
    pub fn effective_concurrency(&self) -> usize {
        self.enrichment_concurrency.max(1)
    }
}
