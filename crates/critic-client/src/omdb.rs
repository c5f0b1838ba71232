use std::time::Duration;

use critic_core::error::AppError;
use critic_core::traits::TitleSearch;
use reqwest::Client;
use url::Url;

pub const DEFAULT_OMDB_URL: &str = "http://www.omdbapi.com/";
const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Title search against the OMDb API (`?apikey=..&s=..`).
///
/// The upstream JSON is handed back untouched.
#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: Url,
    api_key: String,
    timeout_secs: u64,
}

impl OmdbClient {
    pub fn new(api_key: &str) -> Result<Self, AppError> {
        Self::with_base_url(api_key, DEFAULT_OMDB_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid OMDb URL '{base_url}': {e}")))?;
        let client = Client::builder()
            .timeout(DEFAULT_SEARCH_TIMEOUT)
            .build()
            .map_err(|e| AppError::Generic(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
            timeout_secs: DEFAULT_SEARCH_TIMEOUT.as_secs(),
        })
    }

    fn search_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("s", query);
        url
    }
}

impl TitleSearch for OmdbClient {
    async fn search(&self, query: &str) -> Result<serde_json::Value, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidRequest(
                "Search query is required".to_string(),
            ));
        }

        tracing::info!(query, "Searching titles");

        let response = self
            .client
            .get(self.search_url(query))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(self.timeout_secs)
                } else {
                    AppError::SearchError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::SearchError(format!(
                "OMDb returned HTTP {}",
                status.as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::SearchError(format!("Failed to parse OMDb response: {e}")))
    }
}
