//! Stage 3: turn the researched companies into a short recommendation.
//!
//! The only stage whose failure ends the run.

use tracing::{info, warn};

use crate::error::{ResearchError, Result};
use crate::pipeline::prompts::synthesis_messages;
use crate::traits::ai::AI;
use crate::types::{company::CompanyInfo, state::AnalysisUpdate};

/// Produce the final recommendation for `query`.
pub async fn synthesize<A: AI>(
    ai: &A,
    query: &str,
    companies: &[CompanyInfo],
) -> Result<AnalysisUpdate> {
    info!(companies = companies.len(), "Generating recommendations");

    let company_data = serialize_companies(companies)?;

    let analysis = ai
        .complete(&synthesis_messages(query, &company_data))
        .await
        .map_err(|e| {
            warn!(error = %e, "Synthesis failed");
            ResearchError::Synthesis(e)
        })?;

    Ok(AnalysisUpdate { analysis })
}

/// Each company as a JSON object, joined with commas. Empty for no companies.
pub fn serialize_companies(companies: &[CompanyInfo]) -> Result<String> {
    let records = companies
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(records.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockAI, MockAICall};

    fn jenkins() -> CompanyInfo {
        CompanyInfo::new("Jenkins", "Automation server", "https://jenkins.io/")
    }

    #[test]
    fn test_serialize_companies() {
        assert_eq!(serialize_companies(&[]).unwrap(), "");

        let data = serialize_companies(&[jenkins(), CompanyInfo::new("Drone", "CI", "")]).unwrap();
        assert!(data.starts_with(r#"{"name":"Jenkins""#));
        assert!(data.contains(r#"},{"name":"Drone""#));
        assert!(data.contains(r#""is_open_source":null"#));
    }

    #[tokio::test]
    async fn test_synthesis_embeds_query_and_companies() {
        let ai = MockAI::new().with_completion("Developer Query: ci tools", "Use Jenkins.");

        let update = synthesize(&ai, "ci tools", &[jenkins()]).await.unwrap();

        assert_eq!(update.analysis, "Use Jenkins.");
        match &ai.calls()[0] {
            MockAICall::Complete { user, .. } => assert!(user.contains(r#""name":"Jenkins""#)),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_synthesis_runs_with_no_companies() {
        let ai = MockAI::new();
        let update = synthesize(&ai, "obscure", &[]).await.unwrap();
        assert_eq!(update.analysis, MockAI::DEFAULT_COMPLETION);
    }

    #[tokio::test]
    async fn test_synthesis_failure_propagates() {
        let ai = MockAI::new().with_completion_error("Developer Query");

        let err = synthesize(&ai, "ci tools", &[jenkins()]).await.unwrap_err();

        assert!(matches!(err, ResearchError::Synthesis(_)));
    }
}
