use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use critic_client::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use critic_client::omdb::DEFAULT_OMDB_URL;
use critic_client::{
    HtmlReviewExtractor, OmdbClient, OpenAiSummarizer, ReqwestFetcher, SourceFetcher,
};
use critic_core::ReviewService;
use critic_core::error::{AppError, ErrorTier};
use critic_core::models::{ReviewRecord, SourceLocation, combined_text};
use critic_core::traits::{Summarizer, TitleSearch};

#[derive(Parser)]
#[command(name = "critic", version, about = "Movie review extractor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract user reviews from a review page
    Scrape {
        #[command(flatten)]
        source: SourceArgs,

        /// Print single-line JSON instead of pretty output
        #[arg(long, default_value_t = false)]
        compact: bool,
    },

    /// Summarize previously extracted reviews with an LLM
    Analyze {
        /// JSON file holding an array of review records
        #[arg(short, long)]
        input: PathBuf,

        /// LLM model to use
        #[arg(short, long, env = "CRITIC_LLM_MODEL", default_value = DEFAULT_MODEL)]
        model: String,

        /// OpenAI-compatible API base URL
        #[arg(short, long, env = "CRITIC_LLM_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// API key (falls back to GEMINI_API_KEY)
        #[arg(short, long, env = "CRITIC_LLM_API_KEY")]
        api_key: Option<String>,
    },

    /// Search titles on OMDb
    Search {
        /// Title query
        #[arg(short, long)]
        query: String,

        #[arg(long, env = "OMDB_BASE_URL", default_value = DEFAULT_OMDB_URL)]
        base_url: String,

        #[arg(short, long, env = "OMDB_API_KEY")]
        api_key: String,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Review page URL
    #[arg(short, long)]
    url: Option<String>,

    /// Saved review page on disk
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl SourceArgs {
    fn location(self) -> SourceLocation {
        match (self.url, self.file) {
            (Some(url), _) => SourceLocation::Url(url.trim().to_string()),
            (None, path) => SourceLocation::File(path.unwrap_or_default()),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("critic=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_code(&e)
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Scrape { source, compact } => cmd_scrape(source.location(), compact).await,
        Commands::Analyze {
            input,
            model,
            base_url,
            api_key,
        } => {
            let api_key = api_key
                .or_else(|| std::env::var("GEMINI_API_KEY").ok())
                .context("CRITIC_LLM_API_KEY (or GEMINI_API_KEY) must be set for analyze")?;
            cmd_analyze(&input, &model, &base_url, &api_key).await
        }
        Commands::Search {
            query,
            base_url,
            api_key,
        } => cmd_search(&query, &base_url, &api_key).await,
    }
}

/// Fetch failures exit with 3, structural extraction failures with 4.
/// (2 is taken by clap for usage errors.)
fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<AppError>().and_then(AppError::tier) {
        Some(ErrorTier::Fetch) => ExitCode::from(3),
        Some(ErrorTier::Extract) => ExitCode::from(4),
        None => ExitCode::FAILURE,
    }
}

async fn cmd_scrape(location: SourceLocation, compact: bool) -> Result<()> {
    // Local machine, so private and loopback hosts are fair game
    let http = ReqwestFetcher::new()
        .map_err(AppError::from)?
        .allow_private_urls();
    let service = ReviewService::new(SourceFetcher::new(http), HtmlReviewExtractor::new());

    let result = service.scrape(&location).await?;

    tracing::info!(
        content_hash = %&result.content_hash[..8],
        "Extracted {} reviews",
        result.reviews.len()
    );
    if result.reviews.is_empty() {
        tracing::warn!("No reviews found at {location}");
    }

    let output = if compact {
        serde_json::to_string(&result.reviews)?
    } else {
        serde_json::to_string_pretty(&result.reviews)?
    };
    println!("{output}");

    Ok(())
}

async fn cmd_analyze(input: &Path, model: &str, base_url: &str, api_key: &str) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read reviews file: {}", input.display()))?;
    let reviews: Vec<ReviewRecord> =
        serde_json::from_str(&raw).context("Reviews file must hold a JSON array of reviews")?;

    let summarizer = OpenAiSummarizer::with_base_url(api_key, model, base_url)?;

    tracing::info!("Analyzing {} reviews with model {} ...", reviews.len(), model);

    let analysis = summarizer.summarize(&combined_text(&reviews)).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({ "analysis": analysis }))?
    );

    Ok(())
}

async fn cmd_search(query: &str, base_url: &str, api_key: &str) -> Result<()> {
    let client = OmdbClient::with_base_url(api_key, base_url)?;
    let results = client.search(query).await?;

    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}
