use critic_client::{HtmlReviewExtractor, OmdbClient, OpenAiSummarizer, ReqwestFetcher};
use critic_core::{AppError, ReviewService};

use crate::config::ServerConfig;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub reviews: ReviewService<ReqwestFetcher, HtmlReviewExtractor>,
    /// None when no LLM key is configured.
    pub summarizer: Option<OpenAiSummarizer>,
    /// None when no OMDb key is configured.
    pub search: Option<OmdbClient>,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Result<Self, AppError> {
        let fetcher = ReqwestFetcher::new()?;
        let fetcher = if config.allow_private_urls {
            fetcher.allow_private_urls()
        } else {
            fetcher
        };

        let summarizer = config
            .llm_api_key
            .as_deref()
            .map(|key| OpenAiSummarizer::with_base_url(key, &config.llm_model, &config.llm_base_url))
            .transpose()?;

        let search = config
            .omdb_api_key
            .as_deref()
            .map(|key| OmdbClient::with_base_url(key, &config.omdb_base_url))
            .transpose()?;

        Ok(Self {
            reviews: ReviewService::new(fetcher, HtmlReviewExtractor::new()),
            summarizer,
            search,
        })
    }
}
