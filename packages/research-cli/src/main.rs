mod config;
mod provider;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use research::{
    ai::OpenAI,
    providers::{FirecrawlProvider, TavilyProvider},
    ResearchWorkflow, WorkflowConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, ProviderKind};
use crate::provider::AnyProvider;

/// Research the tools and companies in a problem domain.
#[derive(Debug, Parser)]
#[command(name = "research", version)]
struct Args {
    /// What to research, e.g. "vector databases"
    #[arg(required = true)]
    query: Vec<String>,

    /// Chat model (overrides OPENAI_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Search/scrape provider (overrides RESEARCH_PROVIDER)
    #[arg(long, value_enum)]
    provider: Option<ProviderKind>,

    /// Companies researched at once (overrides RESEARCH_CONCURRENCY)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Print the full research state as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,research=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(model) = args.model {
        config.openai_model = model;
    }
    if let Some(provider) = args.provider {
        config.provider = provider;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }

    let query = args.query.join(" ");
    tracing::info!(
        provider = %config.provider,
        model = %config.openai_model,
        "Configuration loaded"
    );

    let workflow = ResearchWorkflow::with_config(
        build_provider(&config)?,
        build_ai(&config),
        WorkflowConfig::default().with_enrichment_concurrency(config.concurrency),
    );

    let state = workflow
        .run(&query)
        .await
        .context("Research run failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", render::render_report(&state));
    }

    Ok(())
}

fn build_provider(config: &Config) -> Result<AnyProvider> {
    let key = config.provider_key()?;

    Ok(match config.provider {
        ProviderKind::Firecrawl => AnyProvider::Firecrawl(
            FirecrawlProvider::new(key).context("Failed to build Firecrawl client")?,
        ),
        ProviderKind::Tavily => AnyProvider::Tavily(TavilyProvider::new(key)),
    })
}

fn build_ai(config: &Config) -> OpenAI {
    let ai = OpenAI::new(config.openai_api_key.clone())
        .with_model(config.openai_model.clone())
        .with_temperature(config.temperature);

    match &config.openai_base_url {
        Some(url) => ai.with_base_url(url.clone()),
        None => ai,
    }
}
