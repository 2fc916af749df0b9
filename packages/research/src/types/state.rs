//! Research state threaded through the pipeline.
//!
//! Stages never touch `ResearchState` directly. Each returns its own update
//! type and the workflow merges it, so a stage can only write the fields its
//! update type names.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::traits::provider::SearchResult;
use crate::types::company::CompanyInfo;

/// Position of a run in the pipeline. Strictly linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    Extracting,
    Researching,
    Analyzing,
    Done,
}

impl Stage {
    /// The stage that follows this one. `Done` is terminal.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Start => Some(Stage::Extracting),
            Stage::Extracting => Some(Stage::Researching),
            Stage::Researching => Some(Stage::Analyzing),
            Stage::Analyzing => Some(Stage::Done),
            Stage::Done => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::Done
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Extracting => "extracting",
            Stage::Researching => "researching",
            Stage::Analyzing => "analyzing",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Mutable context for one research run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchState {
    /// The user's query, echoed unchanged
    pub query: String,

    /// Tool names found by discovery, in model order
    #[serde(default)]
    pub extracted_tools: Vec<String>,

    /// Enriched companies, in target order
    #[serde(default)]
    pub companies: Vec<CompanyInfo>,

    /// Discovery search hits (informational)
    #[serde(default)]
    pub search_results: Vec<SearchResult>,

    /// Synthesized report, set by the final stage
    pub analysis: Option<String>,
}

impl ResearchState {
    /// Initial state for a query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            extracted_tools: Vec::new(),
            companies: Vec::new(),
            search_results: Vec::new(),
            analysis: None,
        }
    }

    /// Merge a stage's update, overwriting only the fields it reports.
    pub fn merge(&mut self, update: impl Into<StateUpdate>) {
        match update.into() {
            StateUpdate::Extraction(update) => {
                self.extracted_tools = update.extracted_tools;
                self.search_results = update.search_results;
            }
            StateUpdate::Research(update) => {
                self.companies = update.companies;
            }
            StateUpdate::Analysis(update) => {
                self.analysis = Some(update.analysis);
            }
        }
    }
}

/// Output of tool discovery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionUpdate {
    pub extracted_tools: Vec<String>,
    pub search_results: Vec<SearchResult>,
}

impl ExtractionUpdate {
    /// The degraded result used when discovery fails.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Output of company enrichment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResearchUpdate {
    pub companies: Vec<CompanyInfo>,
}

/// Output of synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisUpdate {
    pub analysis: String,
}

/// A partial state update from exactly one stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    Extraction(ExtractionUpdate),
    Research(ResearchUpdate),
    Analysis(AnalysisUpdate),
}

impl StateUpdate {
    /// The stage that is allowed to produce this update.
    pub fn stage(&self) -> Stage {
        match self {
            StateUpdate::Extraction(_) => Stage::Extracting,
            StateUpdate::Research(_) => Stage::Researching,
            StateUpdate::Analysis(_) => Stage::Analyzing,
        }
    }
}

impl From<ExtractionUpdate> for StateUpdate {
    fn from(update: ExtractionUpdate) -> Self {
        StateUpdate::Extraction(update)
    }
}

impl From<ResearchUpdate> for StateUpdate {
    fn from(update: ResearchUpdate) -> Self {
        StateUpdate::Research(update)
    }
}

impl From<AnalysisUpdate> for StateUpdate {
    fn from(update: AnalysisUpdate) -> Self {
        StateUpdate::Analysis(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_sequence_is_linear() {
        let mut stage = Stage::Start;
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            visited.push(next);
            stage = next;
        }

        assert_eq!(
            visited,
            vec![
                Stage::Start,
                Stage::Extracting,
                Stage::Researching,
                Stage::Analyzing,
                Stage::Done
            ]
        );
        assert!(stage.is_terminal());
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = ResearchState::new("vector databases");
        assert_eq!(state.query, "vector databases");
        assert!(state.extracted_tools.is_empty());
        assert!(state.companies.is_empty());
        assert!(state.search_results.is_empty());
        assert!(state.analysis.is_none());
    }

    #[test]
    fn test_merge_touches_only_reported_fields() {
        let mut state = ResearchState::new("ci tools");
        state.merge(ExtractionUpdate {
            extracted_tools: vec!["Jenkins".to_string()],
            search_results: vec![],
        });
        state.merge(ResearchUpdate {
            companies: vec![CompanyInfo::new("Jenkins", "", "https://jenkins.io")],
        });

        // A later extraction update must not clear companies.
        state.merge(ExtractionUpdate::empty());

        assert_eq!(state.query, "ci tools");
        assert!(state.extracted_tools.is_empty());
        assert_eq!(state.companies.len(), 1);
        assert!(state.analysis.is_none());

        state.merge(AnalysisUpdate {
            analysis: "Jenkins is fine.".to_string(),
        });
        assert_eq!(state.analysis.as_deref(), Some("Jenkins is fine."));
        assert_eq!(state.companies.len(), 1);
    }

    #[test]
    fn test_update_stage() {
        let update: StateUpdate = ResearchUpdate::default().into();
        assert_eq!(update.stage(), Stage::Researching);
    }
}
