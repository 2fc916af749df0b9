//! Competitive Research Library
//!
//! Given a query naming a problem domain ("vector databases", "CI tools"),
//! discovers candidate tools, researches each company's site and writes a
//! short recommendation.
//!
//! # Pipeline
//!
//! 1. **Extract** - search for comparison articles and have the model list
//!    the tools they mention
//! 2. **Enrich** - find each tool's official site and analyse it into a
//!    [`CompanyInfo`]
//! 3. **Synthesize** - turn the companies into a recommendation
//!
//! Extraction and enrichment degrade instead of failing. Only synthesis can
//! fail a run.
//!
//! # Usage
//!
//! ```rust,ignore
//! use research::{ResearchWorkflow, ai::OpenAI, providers::FirecrawlProvider};
//!
//! let workflow = ResearchWorkflow::new(FirecrawlProvider::from_env()?, OpenAI::from_env()?);
//! let state = workflow.run("vector databases").await?;
//!
//! for company in &state.companies {
//!     println!("{}: {}", company.name, company.pricing_label());
//! }
//! println!("{}", state.analysis.unwrap_or_default());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Adapter seams (ResearchProvider, AI)
//! - [`types`] - Company records, research state, configuration
//! - [`pipeline`] - The three stages and the workflow that runs them
//! - [`providers`] - Search/scrape implementations (feature-gated)
//! - [`ai`] - Model implementations (feature-gated)
//! - [`schema`] - Strict JSON schemas for structured output
//! - [`security`] - API key handling
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod schema;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{InferenceError, ProviderError, ResearchError, Result};
pub use pipeline::ResearchWorkflow;
pub use schema::{OutputSchema, StructuredOutput};
pub use security::SecretString;
pub use traits::{
    ai::{Message, Role, AI},
    provider::{PageContent, ResearchProvider, SearchResult},
};
pub use types::{
    company::{CompanyAnalysis, CompanyInfo, TriState},
    config::WorkflowConfig,
    state::{AnalysisUpdate, ExtractionUpdate, ResearchState, ResearchUpdate, Stage, StateUpdate},
};

// Re-export testing utilities
pub use testing::{MockAI, MockProvider};
