pub mod error;
pub mod models;
pub mod scrape;
pub mod strategy;
pub mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use error::{AppError, ErrorTier, ExtractError, FetchError};
pub use models::{
    RawDocument, ReviewRecord, ScrapeResult, SourceLocation, combined_text, compute_hash,
};
pub use scrape::ReviewService;
pub use strategy::{Strategy, first_match, resolve};
pub use traits::{Extractor, Fetcher, Summarizer, TitleSearch};
