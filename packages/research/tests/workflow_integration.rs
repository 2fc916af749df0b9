//! Integration tests for the research workflow.
//!
//! These run the full three-stage pipeline against mock adapters:
//! 1. Discover tools from comparison articles
//! 2. Research each company's official site
//! 3. Synthesize a recommendation

use proptest::prelude::*;
use research::{
    testing::{MockAI, MockProvider},
    CompanyInfo, ResearchError, ResearchWorkflow, SearchResult, TriState, WorkflowConfig,
};

const ANALYSIS: &str = r#"{
    "pricing_model": "Freemium",
    "is_open_source": true,
    "tech_stack": ["Rust", "gRPC"],
    "description": "Open-source vector search engine",
    "api_available": true,
    "language_support": ["Python", "TypeScript"],
    "integration_capabilities": ["LangChain"]
}"#;

fn discovery(query: &str) -> String {
    format!("{} tools comparison best alternatives", query)
}

fn site_query(name: &str) -> String {
    format!("{} official site", name)
}

/// A provider that knows an official site and page for every tool in `names`.
fn provider_with_sites(provider: MockProvider, names: &[&str]) -> MockProvider {
    names.iter().fold(provider, |provider, name| {
        let url = format!("https://{}.example.com/", name.to_lowercase().replace(' ', "-"));
        provider
            .with_results(
                &site_query(name),
                vec![SearchResult::from_url(&url)
                    .unwrap()
                    .with_title(*name)
                    .with_body(format!("{} home page", name))],
            )
            .with_page(&url, &format!("# {}\nDocs and pricing for {}.", name, name))
    })
}

/// Discovery that yields exactly `names`, one per line.
fn discovering(query: &str, names: &[&str]) -> (MockProvider, MockAI) {
    let article = "https://blog.example.com/comparison";
    let provider = MockProvider::new()
        .with_urls(&discovery(query), &[article])
        .with_page(article, "Comparison article body.");
    let ai = MockAI::new()
        .with_completion("Comparison article body.", &names.join("\n"))
        .with_default_structured(ANALYSIS);
    (provider, ai)
}

fn names(companies: &[CompanyInfo]) -> Vec<&str> {
    companies.iter().map(|c| c.name.as_str()).collect()
}

#[tokio::test]
async fn test_vector_databases_end_to_end() {
    let article = "https://blog.example.com/vector-dbs";
    let provider = MockProvider::new()
        .with_urls(&discovery("vector databases"), &[article])
        .with_page(article, "Compare Pinecone, Weaviate, Qdrant.");
    let provider = provider_with_sites(provider, &["Pinecone", "Weaviate", "Qdrant"]);
    let ai = MockAI::new()
        .with_completion("Compare Pinecone", "Pinecone\nWeaviate\nQdrant")
        .with_completion("Developer Query: vector databases", "Pick Qdrant.")
        .with_default_structured(ANALYSIS);

    let workflow = ResearchWorkflow::new(provider, ai);
    let state = workflow.run("vector databases").await.unwrap();

    assert_eq!(state.query, "vector databases");
    assert_eq!(state.extracted_tools, vec!["Pinecone", "Weaviate", "Qdrant"]);
    assert_eq!(names(&state.companies), vec!["Pinecone", "Weaviate", "Qdrant"]);
    assert_eq!(state.search_results.len(), 1);
    assert_eq!(state.analysis.as_deref(), Some("Pick Qdrant."));

    let qdrant = &state.companies[2];
    assert_eq!(qdrant.website, "https://qdrant.example.com/");
    assert_eq!(qdrant.pricing_label(), "Freemium");
    assert_eq!(qdrant.is_open_source, TriState::Yes);
    assert_eq!(qdrant.tech_stack, vec!["Rust", "gRPC"]);
    assert!(qdrant.competitors.is_empty());
    assert!(qdrant.developer_experience_rating.is_none());
}

#[tokio::test]
async fn test_no_discovery_results_falls_back_to_direct_search() {
    let provider = MockProvider::new().with_results(
        "ci tools",
        vec![
            SearchResult::from_url("https://jenkins.example.com/blog")
                .unwrap()
                .with_title("Jenkins"),
            SearchResult::from_url("https://untitled.example.com/").unwrap(),
        ],
    );
    let provider = provider_with_sites(provider, &["Jenkins", "Unknown Tool"]);
    let ai = MockAI::new().with_default_structured(ANALYSIS);

    let workflow = ResearchWorkflow::new(provider.clone(), ai.clone());
    let state = workflow.run("ci tools").await.unwrap();

    assert!(state.extracted_tools.is_empty());
    assert!(state.search_results.is_empty());
    assert_eq!(names(&state.companies), vec!["Jenkins", "Unknown Tool"]);
    assert_eq!(
        provider.searched_queries(),
        vec![
            discovery("ci tools"),
            "ci tools".to_string(),
            site_query("Jenkins"),
            site_query("Unknown Tool"),
        ]
    );
    // No article content, so discovery never called the model.
    assert_eq!(ai.completion_count(), 1);
}

#[tokio::test]
async fn test_fallback_never_exceeds_fallback_limit() {
    let urls: Vec<String> = (0..6)
        .map(|i| format!("https://tool{}.example.com/", i))
        .collect();
    let results = urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            SearchResult::from_url(url)
                .unwrap()
                .with_title(format!("Tool{}", i))
        })
        .collect();
    let provider = MockProvider::new().with_results("feature flags", results);
    let provider = provider_with_sites(provider, &["Tool0", "Tool1", "Tool2", "Tool3", "Tool4"]);

    let workflow = ResearchWorkflow::new(provider, MockAI::new().with_default_structured(ANALYSIS));
    let state = workflow.run("feature flags").await.unwrap();

    assert_eq!(names(&state.companies), vec!["Tool0", "Tool1", "Tool2"]);
}

#[tokio::test]
async fn test_extracted_tools_are_capped_at_four() {
    let tools = ["A", "B", "C", "D", "E", "F"];
    let (provider, ai) = discovering("observability", &tools);
    let provider = provider_with_sites(provider, &tools);

    let workflow = ResearchWorkflow::new(provider.clone(), ai);
    let state = workflow.run("observability").await.unwrap();

    assert_eq!(state.extracted_tools.len(), 6);
    assert_eq!(names(&state.companies), vec!["A", "B", "C", "D"]);
    assert!(!provider.searched_queries().contains(&site_query("E")));
}

#[tokio::test]
async fn test_target_without_official_site_is_skipped() {
    let (provider, ai) = discovering("queues", &["Kafka", "Ghost", "RabbitMQ"]);
    let provider = provider_with_sites(provider, &["Kafka", "RabbitMQ"]);

    let workflow = ResearchWorkflow::new(provider, ai);
    let state = workflow.run("queues").await.unwrap();

    assert_eq!(names(&state.companies), vec!["Kafka", "RabbitMQ"]);
}

#[tokio::test]
async fn test_failed_analysis_is_isolated_to_one_company() {
    let (provider, ai) = discovering("search engines", &["Meilisearch", "Typesense"]);
    let provider = provider_with_sites(provider, &["Meilisearch", "Typesense"]);
    let ai = ai.with_structured_error("Company/Tool: Meilisearch");

    let workflow = ResearchWorkflow::new(provider, ai);
    let state = workflow.run("search engines").await.unwrap();

    let failed = &state.companies[0];
    assert_eq!(failed.description, "failed");
    assert_eq!(failed.pricing_label(), "unknown");
    assert_eq!(failed.is_open_source, TriState::Unknown);
    assert_eq!(failed.api_available, TriState::Unknown);
    assert!(failed.tech_stack.is_empty());
    assert_eq!(failed.website, "https://meilisearch.example.com/");

    let ok = &state.companies[1];
    assert_eq!(ok.description, "Open-source vector search engine");
    assert!(state.analysis.is_some());
}

#[tokio::test]
async fn test_discovery_model_failure_degrades_to_fallback() {
    let (provider, _) = discovering("monitoring", &[]);
    let provider = provider.with_results(
        "monitoring",
        vec![SearchResult::from_url("https://grafana.example.com/x")
            .unwrap()
            .with_title("Grafana")],
    );
    let provider = provider_with_sites(provider, &["Grafana"]);
    let ai = MockAI::new()
        .with_completion_error("Comparison article body.")
        .with_default_structured(ANALYSIS);

    let workflow = ResearchWorkflow::new(provider, ai);
    let state = workflow.run("monitoring").await.unwrap();

    assert!(state.extracted_tools.is_empty());
    assert_eq!(names(&state.companies), vec!["Grafana"]);
}

#[tokio::test]
async fn test_synthesis_failure_fails_the_run() {
    let (provider, ai) = discovering("orms", &["Diesel"]);
    let provider = provider_with_sites(provider, &["Diesel"]);
    let ai = ai.with_completion_error("Developer Query: orms");

    let workflow = ResearchWorkflow::new(provider, ai);
    let err = workflow.run("orms").await.unwrap_err();

    assert!(matches!(err, ResearchError::Synthesis(_)));
}

#[tokio::test]
async fn test_identical_adapters_give_identical_state() {
    let tools = ["Redis", "Memcached", "Ghost"];
    let (provider, ai) = discovering("caches", &tools);
    let provider = provider_with_sites(provider, &["Redis", "Memcached"]);

    let workflow = ResearchWorkflow::new(provider, ai);
    let first = workflow.run("caches").await.unwrap();
    let second = workflow.run("caches").await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_parallel_enrichment_keeps_target_order() {
    let tools = ["Alpha", "Beta", "Gamma", "Delta"];
    let (provider, ai) = discovering("databases", &tools);
    let provider = provider_with_sites(provider, &["Alpha", "Gamma", "Delta"]);
    let ai = ai.with_structured_error("Company/Tool: Gamma");

    let sequential = ResearchWorkflow::new(provider.clone(), ai.clone())
        .run("databases")
        .await
        .unwrap();
    let parallel = ResearchWorkflow::with_config(
        provider,
        ai,
        WorkflowConfig::default().with_enrichment_concurrency(4),
    )
    .run("databases")
    .await
    .unwrap();

    assert_eq!(names(&parallel.companies), vec!["Alpha", "Gamma", "Delta"]);
    assert_eq!(sequential.companies, parallel.companies);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_query_is_echoed(query in "[a-zA-Z0-9 ]{0,40}") {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let workflow = ResearchWorkflow::new(MockProvider::new(), MockAI::new());

        let state = rt.block_on(workflow.run(&query)).unwrap();

        prop_assert_eq!(state.query, query);
        prop_assert!(state.companies.is_empty());
    }
}
