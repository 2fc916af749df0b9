//! The research pipeline.
//!
//! - [`extract`] - Stage 1: discover tool names from comparison articles
//! - [`enrich`] - Stage 2: research each company and analyse its site
//! - [`synthesize`] - Stage 3: write the recommendation
//! - [`workflow`] - The state machine that runs the stages in order

pub mod enrich;
pub mod extract;
pub mod prompts;
pub mod synthesize;
pub mod workflow;

pub use enrich::{analyze_company, research_companies, research_target, select_targets};
pub use extract::{extract_tools, parse_tool_names};
pub use prompts::{
    synthesis_messages, tool_analysis_messages, tool_extraction_messages, SYNTHESIS_PROMPT,
    SYNTHESIS_SYSTEM_PROMPT, TOOL_ANALYSIS_PROMPT, TOOL_ANALYSIS_SYSTEM_PROMPT,
    TOOL_EXTRACTION_PROMPT, TOOL_EXTRACTION_SYSTEM_PROMPT,
};
pub use synthesize::{serialize_companies, synthesize};
pub use workflow::ResearchWorkflow;
