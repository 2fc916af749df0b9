//! Per-company records.
//!
//! `CompanyAnalysis` is the structured-output target for the model and only
//! lives for one enrichment step. `CompanyInfo` is what ends up in the
//! research state.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Description marking an analysis that fell back after a model failure.
pub const FAILED_ANALYSIS_MARKER: &str = "failed";

/// Pricing model used when nothing better is known.
pub const UNKNOWN_PRICING: &str = "unknown";

/// A yes/no answer that may also be unknown.
///
/// Serialized as `true`, `false` or `null` so the model sees a plain
/// nullable boolean, while Rust code never confuses "unknown" with "no".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unknown,
}

impl TriState {
    pub fn is_known(self) -> bool {
        !matches!(self, TriState::Unknown)
    }

    /// Human-readable label for reports.
    pub fn label(self) -> &'static str {
        match self {
            TriState::Yes => "Yes",
            TriState::No => "No",
            TriState::Unknown => "Unknown",
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => TriState::Yes,
            Some(false) => TriState::No,
            None => TriState::Unknown,
        }
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        match value {
            TriState::Yes => Some(true),
            TriState::No => Some(false),
            TriState::Unknown => None,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        Some(value).into()
    }
}

/// Attributes the model extracts from one company's page.
///
/// Only `pricing_model` is required on the wire; every other field defaults
/// to unknown/empty so downstream code never branches on absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompanyAnalysis {
    /// Pricing category, e.g. "Free", "Freemium", "Paid", "Enterprise"
    pub pricing_model: String,

    /// Whether the tool is open source
    #[serde(default)]
    #[schemars(with = "Option<bool>")]
    pub is_open_source: TriState,

    /// Technologies the tool is built on or supports
    #[serde(default)]
    pub tech_stack: Vec<String>,

    /// Short description of what the tool does
    #[serde(default)]
    pub description: String,

    /// Whether a public API is available
    #[serde(default)]
    #[schemars(with = "Option<bool>")]
    pub api_available: TriState,

    /// Programming languages with SDKs or first-class support
    #[serde(default)]
    pub language_support: Vec<String>,

    /// Platforms and services it integrates with
    #[serde(default)]
    pub integration_capabilities: Vec<String>,
}

impl CompanyAnalysis {
    /// The fallback substituted when structured analysis fails.
    pub fn failed() -> Self {
        Self {
            pricing_model: UNKNOWN_PRICING.to_string(),
            is_open_source: TriState::Unknown,
            tech_stack: Vec::new(),
            description: FAILED_ANALYSIS_MARKER.to_string(),
            api_available: TriState::Unknown,
            language_support: Vec::new(),
            integration_capabilities: Vec::new(),
        }
    }

    /// Whether this is the failure fallback rather than a real analysis.
    pub fn is_failed(&self) -> bool {
        self.description == FAILED_ANALYSIS_MARKER
    }
}

/// One researched company, accumulated during enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub description: String,

    /// Website URL; empty when it could not be resolved
    pub website: String,

    pub pricing_model: Option<String>,

    #[serde(default)]
    pub is_open_source: TriState,

    #[serde(default)]
    pub tech_stack: Vec<String>,

    #[serde(default)]
    pub competitors: Vec<String>,

    #[serde(default)]
    pub api_available: TriState,

    #[serde(default)]
    pub language_support: Vec<String>,

    #[serde(default)]
    pub integration_capabilities: Vec<String>,

    pub developer_experience_rating: Option<String>,
}

impl CompanyInfo {
    /// Seed a record from a search hit, before any analysis.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        website: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            website: website.into(),
            pricing_model: None,
            is_open_source: TriState::Unknown,
            tech_stack: Vec::new(),
            competitors: Vec::new(),
            api_available: TriState::Unknown,
            language_support: Vec::new(),
            integration_capabilities: Vec::new(),
            developer_experience_rating: None,
        }
    }

    /// Overwrite the analysed fields. Name, website, competitors and the
    /// developer-experience rating are left alone.
    pub fn apply_analysis(&mut self, analysis: CompanyAnalysis) {
        self.description = analysis.description;
        self.pricing_model = Some(analysis.pricing_model);
        self.is_open_source = analysis.is_open_source;
        self.tech_stack = analysis.tech_stack;
        self.api_available = analysis.api_available;
        self.language_support = analysis.language_support;
        self.integration_capabilities = analysis.integration_capabilities;
    }

    /// Pricing model for display, "unknown" when never analysed.
    pub fn pricing_label(&self) -> &str {
        self.pricing_model.as_deref().unwrap_or(UNKNOWN_PRICING)
    }
}
