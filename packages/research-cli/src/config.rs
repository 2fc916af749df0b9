use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use research::{ai::DEFAULT_MODEL, SecretString};
use std::{env, fmt, str::FromStr};

/// Which search/scrape backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderKind {
    Firecrawl,
    Tavily,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firecrawl" => Ok(Self::Firecrawl),
            "tavily" => Ok(Self::Tavily),
            other => bail!("unknown research provider '{}' (expected firecrawl or tavily)", other),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Firecrawl => "firecrawl",
            Self::Tavily => "tavily",
        })
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: SecretString,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub temperature: f32,
    pub provider: ProviderKind,
    pub firecrawl_api_key: Option<SecretString>,
    pub tavily_api_key: Option<SecretString>,
    pub concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_blank = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        let secret = |key: &str| non_blank(key).map(SecretString::new);

        Ok(Self {
            openai_api_key: secret("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            openai_model: non_blank("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: non_blank("OPENAI_BASE_URL"),
            temperature: non_blank("LLM_TEMPERATURE")
                .unwrap_or_else(|| "0.1".to_string())
                .parse()
                .context("LLM_TEMPERATURE must be a number")?,
            provider: non_blank("RESEARCH_PROVIDER")
                .unwrap_or_else(|| "firecrawl".to_string())
                .parse()?,
            firecrawl_api_key: secret("FIRECRAWL_API_KEY"),
            tavily_api_key: secret("TAVILY_API_KEY"),
            concurrency: non_blank("RESEARCH_CONCURRENCY")
                .unwrap_or_else(|| "1".to_string())
                .parse()
                .context("RESEARCH_CONCURRENCY must be a positive integer")?,
        })
    }

    /// API key for the selected provider.
    pub fn provider_key(&self) -> Result<SecretString> {
        match self.provider {
            ProviderKind::Firecrawl => self
                .firecrawl_api_key
                .clone()
                .context("FIRECRAWL_API_KEY must be set for the firecrawl provider"),
            ProviderKind::Tavily => self
                .tavily_api_key
                .clone()
                .context("TAVILY_API_KEY must be set for the tavily provider"),
        }
    }
}
