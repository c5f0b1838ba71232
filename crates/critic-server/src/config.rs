use critic_client::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use critic_client::omdb::DEFAULT_OMDB_URL;
use critic_core::AppError;

const DEFAULT_PORT: u16 = 5000;

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Key for the OpenAI-compatible LLM endpoint (None = `/analyze` disabled).
    pub llm_api_key: Option<String>,
    pub llm_model: String,
    pub llm_base_url: String,
    /// OMDb key (None = `/api/search` disabled).
    pub omdb_api_key: Option<String>,
    pub omdb_base_url: String,
    /// Let `/scrape` reach private/loopback addresses.
    pub allow_private_urls: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            llm_api_key: None,
            llm_model: DEFAULT_MODEL.to_string(),
            llm_base_url: DEFAULT_BASE_URL.to_string(),
            omdb_api_key: None,
            omdb_base_url: DEFAULT_OMDB_URL.to_string(),
            allow_private_urls: false,
        }
    }
}

impl ServerConfig {
    /// Read configuration from environment variables.
    ///
    /// - `CRITIC_SERVER_PORT` (falls back to `PORT`, then 5000)
    /// - `CRITIC_LLM_API_KEY` (falls back to `GEMINI_API_KEY`)
    /// - `CRITIC_LLM_MODEL`, `CRITIC_LLM_BASE_URL`
    /// - `OMDB_API_KEY`, `OMDB_BASE_URL`
    /// - `CRITIC_ALLOW_PRIVATE_URLS` (`true`/`false`, `1`/`0`)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("CRITIC_SERVER_PORT").or_else(|| get("PORT")) {
            None => defaults.port,
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::ConfigError(format!("Invalid port '{raw}': must be 0-65535"))
            })?,
        };

        let allow_private_urls = match get("CRITIC_ALLOW_PRIVATE_URLS") {
            None => false,
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                AppError::ConfigError(format!(
                    "Invalid CRITIC_ALLOW_PRIVATE_URLS '{raw}': expected true or false"
                ))
            })?,
        };

        Ok(Self {
            port,
            llm_api_key: get("CRITIC_LLM_API_KEY").or_else(|| get("GEMINI_API_KEY")),
            llm_model: get("CRITIC_LLM_MODEL").unwrap_or(defaults.llm_model),
            llm_base_url: get("CRITIC_LLM_BASE_URL").unwrap_or(defaults.llm_base_url),
            omdb_api_key: get("OMDB_API_KEY"),
            omdb_base_url: get("OMDB_BASE_URL").unwrap_or(defaults.omdb_base_url),
            allow_private_urls,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
