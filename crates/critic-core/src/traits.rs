use std::future::Future;

use crate::error::{AppError, ExtractError, FetchError};
use crate::models::{RawDocument, ReviewRecord, SourceLocation};

/// Retrieves raw document content for a location.
///
/// One attempt per call, bounded by the implementation's timeout. No retries.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(
        &self,
        location: &SourceLocation,
    ) -> impl Future<Output = Result<RawDocument, FetchError>> + Send;
}

/// Turns a document into an ordered sequence of review records.
///
/// Implementations are pure: no I/O and no state carried between calls.
pub trait Extractor: Send + Sync + Clone {
    fn extract(&self, document: &RawDocument) -> Result<Vec<ReviewRecord>, ExtractError>;
}

/// Produces a free-text analysis of concatenated review text.
pub trait Summarizer: Send + Sync + Clone {
    fn summarize(&self, text: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Looks up titles in a third-party metadata service.
///
/// The upstream response is returned verbatim.
pub trait TitleSearch: Send + Sync + Clone {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<serde_json::Value, AppError>> + Send;
}
