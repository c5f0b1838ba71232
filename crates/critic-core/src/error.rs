use thiserror::Error;

/// Transport-layer failure while retrieving a document.
///
/// Never retried internally; callers decide via [`FetchError::is_retryable`].
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request exceeded the fetcher's per-call timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection could not be established.
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status code.
    #[error("HTTP {status} for {location}")]
    Status { status: u16, location: String },

    /// Any other HTTP client failure (body read, redirect loop, ...).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The location cannot be handled by this fetcher.
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// Request refused by the private-address guard.
    #[error("SSRF blocked: {0}")]
    Blocked(String),

    /// Local document could not be read.
    #[error("I/O error: {0}")]
    Io(String),

    /// Local document contains no HTML start marker.
    #[error("No HTML markup found in {0}")]
    NoMarkup(String),
}

impl FetchError {
    /// Returns true if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout(_) | FetchError::Network(_) => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Structural failure: the content cannot be interpreted as markup at all.
///
/// A document that parses but holds no reviews is *not* an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Document is empty")]
    Empty,

    #[error("Document is not valid UTF-8: {0}")]
    Undecodable(String),
}

/// Which layer of the pipeline produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTier {
    Fetch,
    Extract,
}

/// Application-wide error types for critic.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// LLM API call failed.
    #[error("LLM error (HTTP {status_code}): {message}")]
    LlmError {
        message: String,
        status_code: u16,
        retryable: bool,
    },

    /// Title search upstream failed.
    #[error("Search error: {0}")]
    SearchError(String),

    /// Upstream request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Caller supplied an unusable request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// The pipeline tier this error belongs to, if any.
    pub fn tier(&self) -> Option<ErrorTier> {
        match self {
            AppError::Fetch(_) => Some(ErrorTier::Fetch),
            AppError::Extract(_) => Some(ErrorTier::Extract),
            _ => None,
        }
    }

    /// Returns true if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Fetch(e) => e.is_retryable(),
            AppError::Timeout(_) | AppError::RateLimitExceeded => true,
            AppError::LlmError { retryable, .. } => *retryable,
            _ => false,
        }
    }
}
