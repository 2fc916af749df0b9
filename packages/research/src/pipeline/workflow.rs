//! The research workflow: a linear state machine over the three stages.
//!
//! ```text
//! Start -> Extracting -> Researching -> Analyzing -> Done
//! ```
//!
//! Each stage reads the state built so far and returns its own update type;
//! the workflow merges it before the next stage starts.

use tracing::{debug, info, info_span, Instrument};

use crate::error::Result;
use crate::pipeline::{enrich::research_companies, extract::extract_tools, synthesize::synthesize};
use crate::traits::{ai::AI, provider::ResearchProvider};
use crate::types::{
    config::WorkflowConfig,
    state::{ResearchState, Stage, StateUpdate},
};

/// Runs research queries against a provider and a model.
///
/// # Example
///
/// ```rust,ignore
/// let workflow = ResearchWorkflow::new(provider, ai);
/// let state = workflow.run("vector databases").await?;
/// println!("{}", state.analysis.unwrap_or_default());
/// ```
pub struct ResearchWorkflow<P: ResearchProvider, A: AI> {
    provider: P,
    ai: A,
    config: WorkflowConfig,
}

impl<P: ResearchProvider, A: AI> ResearchWorkflow<P, A> {
    /// Create a workflow with default configuration.
    pub fn new(provider: P, ai: A) -> Self {
        Self {
            provider,
            ai,
            config: WorkflowConfig::default(),
        }
    }

    /// Create with custom configuration.
    pub fn with_config(provider: P, ai: A, config: WorkflowConfig) -> Self {
        Self {
            provider,
            ai,
            config,
        }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn ai(&self) -> &A {
        &self.ai
    }

    /// Research `query` end to end.
    ///
    /// Discovery and enrichment degrade instead of failing; only a synthesis
    /// error is returned.
    pub async fn run(&self, query: &str) -> Result<ResearchState> {
        self.run_stages(query)
            .instrument(info_span!("research", query))
            .await
    }

    async fn run_stages(&self, query: &str) -> Result<ResearchState> {
        let mut state = ResearchState::new(query);
        let mut stage = Stage::Start;

        while let Some(next) = stage.next() {
            debug!(from = %stage, to = %next, "Stage transition");

            if let Some(update) = self.execute(next, &state).await? {
                debug_assert_eq!(update.stage(), next);
                state.merge(update);
            }
            stage = next;
        }

        info!(
            tools = state.extracted_tools.len(),
            companies = state.companies.len(),
            "Research complete"
        );

        Ok(state)
    }

    /// Run one stage against the current state. `None` for stages that
    /// produce nothing.
    async fn execute(&self, stage: Stage, state: &ResearchState) -> Result<Option<StateUpdate>> {
        let update: StateUpdate = match stage {
            Stage::Start | Stage::Done => return Ok(None),
            Stage::Extracting => {
                extract_tools(&self.provider, &self.ai, &self.config, &state.query)
                    .await
                    .into()
            }
            Stage::Researching => research_companies(
                &self.provider,
                &self.ai,
                &self.config,
                &state.query,
                &state.extracted_tools,
            )
            .await
            .into(),
            Stage::Analyzing => synthesize(&self.ai, &state.query, &state.companies)
                .await?
                .into(),
        };

        Ok(Some(update))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResearchError;
    use crate::testing::{MockAI, MockProvider};

    #[tokio::test]
    async fn test_empty_world_still_synthesizes() {
        let workflow = ResearchWorkflow::new(MockProvider::new(), MockAI::new());

        let state = workflow.run("nothing at all").await.unwrap();

        assert_eq!(state.query, "nothing at all");
        assert!(state.extracted_tools.is_empty());
        assert!(state.companies.is_empty());
        assert!(state.search_results.is_empty());
        assert_eq!(state.analysis.as_deref(), Some(MockAI::DEFAULT_COMPLETION));
    }

    #[tokio::test]
    async fn test_stages_run_in_order() {
        let provider = MockProvider::new();
        let workflow = ResearchWorkflow::new(provider.clone(), MockAI::new());

        workflow.run("ci tools").await.unwrap();

        // Discovery search, then the direct-search fallback.
        assert_eq!(
            provider.searched_queries(),
            vec!["ci tools tools comparison best alternatives", "ci tools"]
        );
    }

    #[tokio::test]
    async fn test_synthesis_error_fails_run() {
        let ai = MockAI::new().with_completion_error("Developer Query");
        let workflow = ResearchWorkflow::new(MockProvider::new(), ai);

        let result = workflow.run("ci tools").await;

        assert!(matches!(result, Err(ResearchError::Synthesis(_))));
    }

    #[tokio::test]
    async fn test_custom_config_is_used() {
        let provider = MockProvider::new();
        let config = WorkflowConfig::default().with_discovery_limit(7);
        let workflow = ResearchWorkflow::with_config(provider.clone(), MockAI::new(), config);

        workflow.run("q").await.unwrap();

        assert_eq!(workflow.config().discovery_limit, 7);
        assert!(matches!(
            &provider.calls()[0],
            crate::testing::MockProviderCall::Search { limit: 7, .. }
        ));
    }
}
