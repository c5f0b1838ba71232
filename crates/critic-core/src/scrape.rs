use crate::error::AppError;
use crate::models::{RawDocument, ScrapeResult, SourceLocation, compute_hash};
use crate::traits::{Extractor, Fetcher};

/// Orchestrates the review pipeline: fetch → extract → hash.
///
/// Generic over its collaborators via traits, enabling dependency injection
/// and testability without real HTTP. Holds no state between calls.
#[derive(Clone)]
pub struct ReviewService<F, E>
where
    F: Fetcher,
    E: Extractor,
{
    fetcher: F,
    extractor: E,
}

impl<F, E> ReviewService<F, E>
where
    F: Fetcher,
    E: Extractor,
{
    pub fn new(fetcher: F, extractor: E) -> Self {
        Self { fetcher, extractor }
    }

    /// Fetch a document and extract its reviews.
    ///
    /// A fetch failure returns immediately; the extractor is never invoked.
    pub async fn scrape(&self, location: &SourceLocation) -> Result<ScrapeResult, AppError> {
        tracing::info!("Fetching {}", location);
        let document = self.fetcher.fetch(location).await?;
        tracing::info!(
            status = ?document.status,
            "Fetched {} bytes of HTML",
            document.len()
        );

        self.extract(&document)
    }

    /// Extract reviews from content supplied directly by the caller.
    pub fn extract(&self, document: &RawDocument) -> Result<ScrapeResult, AppError> {
        let reviews = self.extractor.extract(document)?;
        let content_hash = compute_hash(&document.body);

        tracing::info!(
            reviews = reviews.len(),
            content_hash = %&content_hash[..8],
            "Extraction complete"
        );

        Ok(ScrapeResult {
            reviews,
            content_hash,
        })
    }
}
