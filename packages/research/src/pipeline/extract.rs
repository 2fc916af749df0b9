//! Stage 1: discover candidate tools for a query.
//!
//! Searches for comparison articles, feeds a prefix of each to the model and
//! reads back one tool name per line. Any failure here yields an empty tool
//! list so enrichment falls back to a direct search.

use tracing::{debug, info, warn};

use crate::error::StageError;
use crate::pipeline::prompts::tool_extraction_messages;
use crate::traits::{
    ai::AI,
    provider::{ResearchProvider, SearchResult},
};
use crate::types::{config::WorkflowConfig, state::ExtractionUpdate};

/// Discover tool names for `query`. Never fails.
pub async fn extract_tools<P, A>(
    provider: &P,
    ai: &A,
    config: &WorkflowConfig,
    query: &str,
) -> ExtractionUpdate
where
    P: ResearchProvider,
    A: AI,
{
    info!(query, "Finding articles");

    match try_extract_tools(provider, ai, config, query).await {
        Ok(update) => {
            info!(
                tools = update.extracted_tools.len(),
                names = %update.extracted_tools.join(", "),
                "Extracted tools"
            );
            update
        }
        Err(e) => {
            warn!(error = %e, "Tool extraction failed, continuing without tools");
            ExtractionUpdate::empty()
        }
    }
}

async fn try_extract_tools<P, A>(
    provider: &P,
    ai: &A,
    config: &WorkflowConfig,
    query: &str,
) -> Result<ExtractionUpdate, StageError>
where
    P: ResearchProvider,
    A: AI,
{
    let search_query = config.discovery_query(query);
    let search_results = provider
        .search(&search_query, config.discovery_limit)
        .await?;

    if search_results.is_empty() {
        info!(search_query = %search_query, "No articles found");
        return Ok(ExtractionUpdate::empty());
    }

    let content = gather_content(provider, config, &search_results).await;
    if content.trim().is_empty() {
        warn!(
            articles = search_results.len(),
            "No article content could be fetched"
        );
        return Ok(ExtractionUpdate {
            extracted_tools: Vec::new(),
            search_results,
        });
    }

    let response = ai
        .complete(&tool_extraction_messages(query, &content))
        .await?;

    Ok(ExtractionUpdate {
        extracted_tools: parse_tool_names(&response),
        search_results,
    })
}

/// Concatenate a prefix of every fetchable article, separated by blank lines.
async fn gather_content<P: ResearchProvider>(
    provider: &P,
    config: &WorkflowConfig,
    results: &[SearchResult],
) -> String {
    let mut content = String::new();

    for result in results {
        match provider.fetch(result.url.as_str()).await {
            Some(page) => {
                content.push_str(page.prefix(config.content_prefix_chars));
                content.push_str("\n\n");
            }
            None => debug!(url = %result.url, "Skipping unfetchable article"),
        }
    }

    content
}

/// Split a model response into tool names: one per line, trimmed, no blanks.
pub fn parse_tool_names(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockAI, MockProvider};
    use proptest::prelude::*;

    const ARTICLES: &str = "vector databases tools comparison best alternatives";

    #[test]
    fn test_parse_tool_names() {
        let names = parse_tool_names("  Pinecone \n\nWeaviate\r\n   \nQdrant\n");
        assert_eq!(names, vec!["Pinecone", "Weaviate", "Qdrant"]);
        assert!(parse_tool_names("").is_empty());
        assert!(parse_tool_names("\n \n").is_empty());
    }

    proptest! {
        #[test]
        fn prop_parsed_names_are_trimmed_and_non_empty(input in "[ a-zA-Z\\n\\t]{0,200}") {
            let names = parse_tool_names(&input);
            for name in &names {
                prop_assert!(!name.is_empty());
                prop_assert_eq!(name.trim(), name.as_str());
            }
            prop_assert!(names.len() <= input.lines().count());
        }
    }

    #[tokio::test]
    async fn test_extracts_tools_from_fetched_articles() {
        let provider = MockProvider::new()
            .with_urls(ARTICLES, &["https://blog.example.com/vector-dbs"])
            .with_page(
                "https://blog.example.com/vector-dbs",
                "Compare Pinecone, Weaviate, Qdrant.",
            );
        let ai = MockAI::new().with_completion("Compare Pinecone", "Pinecone\nWeaviate\nQdrant");

        let update =
            extract_tools(&provider, &ai, &WorkflowConfig::default(), "vector databases").await;

        assert_eq!(update.extracted_tools, vec!["Pinecone", "Weaviate", "Qdrant"]);
        assert_eq!(update.search_results.len(), 1);
        assert_eq!(provider.searched_queries(), vec![ARTICLES]);
    }

    #[tokio::test]
    async fn test_content_is_truncated_per_article() {
        let long_body = "x".repeat(5000);
        let provider = MockProvider::new()
            .with_urls(ARTICLES, &["https://a.com/1", "https://b.com/2"])
            .with_page("https://a.com/1", &long_body)
            .with_page("https://b.com/2", "short");
        let ai = MockAI::new();

        extract_tools(&provider, &ai, &WorkflowConfig::default(), "vector databases").await;

        let calls = ai.calls();
        let user = match &calls[0] {
            crate::testing::MockAICall::Complete { user, .. } => user.clone(),
            other => panic!("unexpected call {:?}", other),
        };
        assert!(user.contains(&format!("{}\n\nshort\n\n", "x".repeat(1500))));
        assert!(!user.contains(&"x".repeat(1501)));
    }

    #[tokio::test]
    async fn test_no_results_skips_model() {
        let provider = MockProvider::new();
        let ai = MockAI::new();

        let update = extract_tools(&provider, &ai, &WorkflowConfig::default(), "nothing").await;

        assert!(update.extracted_tools.is_empty());
        assert_eq!(ai.completion_count(), 0);
    }

    #[tokio::test]
    async fn test_unfetchable_articles_skip_model() {
        let provider = MockProvider::new().with_urls(ARTICLES, &["https://gone.example.com/x"]);
        let ai = MockAI::new();

        let update =
            extract_tools(&provider, &ai, &WorkflowConfig::default(), "vector databases").await;

        assert!(update.extracted_tools.is_empty());
        assert_eq!(update.search_results.len(), 1);
        assert_eq!(ai.completion_count(), 0);
    }

    #[tokio::test]
    async fn test_search_failure_degrades_to_empty() {
        let provider = MockProvider::new().with_failing_search(ARTICLES);
        let ai = MockAI::new();

        let update =
            extract_tools(&provider, &ai, &WorkflowConfig::default(), "vector databases").await;

        assert_eq!(update, ExtractionUpdate::empty());
    }

    #[tokio::test]
    async fn test_model_failure_degrades_to_empty() {
        let provider = MockProvider::new()
            .with_urls(ARTICLES, &["https://a.com/1"])
            .with_page("https://a.com/1", "Compare things");
        let ai = MockAI::new().with_completion_error("Compare things");

        let update =
            extract_tools(&provider, &ai, &WorkflowConfig::default(), "vector databases").await;

        assert!(update.extracted_tools.is_empty());
        assert!(update.search_results.is_empty());
    }
}
