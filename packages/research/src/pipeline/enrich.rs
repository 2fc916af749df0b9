//! Stage 2: research each candidate company.
//!
//! Targets are the first few extracted tools, or, when discovery found
//! nothing, the titles of a direct search on the query. Each target gets an
//! official-site lookup, a page fetch and a structured analysis. A target
//! that cannot be found is skipped; a target whose analysis fails keeps the
//! failure sentinel. Neither stops the other targets.

use futures::{future, stream, StreamExt};
use tracing::{debug, info, warn};

use crate::pipeline::prompts::tool_analysis_messages;
use crate::traits::{ai::AI, provider::ResearchProvider};
use crate::types::{
    company::{CompanyAnalysis, CompanyInfo},
    config::WorkflowConfig,
    state::ResearchUpdate,
};

/// Research every target and return the companies found, in target order.
pub async fn research_companies<P, A>(
    provider: &P,
    ai: &A,
    config: &WorkflowConfig,
    query: &str,
    extracted_tools: &[String],
) -> ResearchUpdate
where
    P: ResearchProvider,
    A: AI,
{
    let targets = select_targets(provider, config, query, extracted_tools).await;
    info!(
        targets = targets.len(),
        names = %targets.join(", "),
        concurrency = config.effective_concurrency(),
        "Researching tools"
    );

    // `buffered` yields in input order regardless of completion order.
    let companies: Vec<CompanyInfo> = stream::iter(targets.iter())
        .map(|name| research_target(provider, ai, config, name))
        .buffered(config.effective_concurrency())
        .filter_map(future::ready)
        .collect()
        .await;

    info!(
        companies = companies.len(),
        skipped = targets.len() - companies.len(),
        "Company research complete"
    );

    ResearchUpdate { companies }
}

/// Choose the names to research.
///
/// Extracted tools win, capped at `max_targets`. Without them, the titles of
/// a direct search on the query are used instead.
pub async fn select_targets<P: ResearchProvider>(
    provider: &P,
    config: &WorkflowConfig,
    query: &str,
    extracted_tools: &[String],
) -> Vec<String> {
    if !extracted_tools.is_empty() {
        return extracted_tools
            .iter()
            .take(config.max_targets)
            .cloned()
            .collect();
    }

    info!("No tools extracted, falling back to direct search");

    match provider.search(query, config.fallback_limit).await {
        Ok(results) => results
            .into_iter()
            .map(|r| {
                r.title
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| config.unknown_tool_name.clone())
            })
            .collect(),
        Err(e) => {
            warn!(error = %e, "Fallback search failed, no targets to research");
            Vec::new()
        }
    }
}

/// Research one target. `None` when no official site was found.
pub async fn research_target<P, A>(
    provider: &P,
    ai: &A,
    config: &WorkflowConfig,
    name: &str,
) -> Option<CompanyInfo>
where
    P: ResearchProvider,
    A: AI,
{
    let site_query = config.official_site_query(name);
    let hit = match provider.search(&site_query, config.official_site_limit).await {
        Ok(results) => results.into_iter().next(),
        Err(e) => {
            warn!(tool = name, error = %e, "Official site search failed, skipping");
            return None;
        }
    };

    let Some(hit) = hit else {
        info!(tool = name, "No official site found, skipping");
        return None;
    };

    let url = hit.url.as_str();
    let mut company = CompanyInfo::new(name, hit.preview_text(), url);

    match provider.fetch(url).await {
        Some(page) => {
            let analysis = analyze_company(ai, name, &page.body).await;
            company.apply_analysis(analysis);
        }
        None => debug!(tool = name, url, "Site not fetchable, keeping search placeholder"),
    }

    Some(company)
}

/// Structured analysis of one company's page.
///
/// Model and schema failures become [`CompanyAnalysis::failed`], so one bad
/// company never aborts enrichment.
pub async fn analyze_company<A: AI>(ai: &A, name: &str, content: &str) -> CompanyAnalysis {
    let messages = tool_analysis_messages(name, content);

    match ai.complete_structured::<CompanyAnalysis>(&messages).await {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!(tool = name, error = %e, "Company analysis failed, using fallback");
            CompanyAnalysis::failed()
        }
    }
}
