//! Test utilities: mock fetcher and extractor.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::sync::{Arc, Mutex};

use crate::error::{ExtractError, FetchError};
use crate::models::{RawDocument, ReviewRecord, SourceLocation};
use crate::traits::{Extractor, Fetcher};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns a configurable response.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns a default HTML document.
    responses: Arc<Mutex<Vec<Result<RawDocument, FetchError>>>>,
    calls: Arc<Mutex<Vec<SourceLocation>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(RawDocument::from_html(html).with_status(200))])
    }

    pub fn with_error(error: FetchError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<RawDocument, FetchError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of fetches performed so far.
    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn locations(&self) -> Vec<SourceLocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, location: &SourceLocation) -> Result<RawDocument, FetchError> {
        self.calls.lock().unwrap().push(location.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(RawDocument::from_html("<html><body>default</body></html>"))
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockExtractor
// ---------------------------------------------------------------------------

/// Mock extractor that returns fixed records and counts invocations.
#[derive(Clone)]
pub struct MockExtractor {
    result: Arc<Mutex<Result<Vec<ReviewRecord>, ExtractError>>>,
    calls: Arc<Mutex<usize>>,
}

impl MockExtractor {
    pub fn new(reviews: Vec<ReviewRecord>) -> Self {
        Self {
            result: Arc::new(Mutex::new(Ok(reviews))),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_error(error: ExtractError) -> Self {
        Self {
            result: Arc::new(Mutex::new(Err(error))),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl Extractor for MockExtractor {
    fn extract(&self, _document: &RawDocument) -> Result<Vec<ReviewRecord>, ExtractError> {
        *self.calls.lock().unwrap() += 1;
        self.result.lock().unwrap().clone()
    }
}
