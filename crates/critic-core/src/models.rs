use std::fmt;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::error::ExtractError;

/// Addressable reference to a document, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// Remote document reachable over HTTP(S).
    Url(String),
    /// Document saved on local storage.
    File(PathBuf),
}

impl SourceLocation {
    /// Classify a location string.
    ///
    /// `http://` and `https://` become [`SourceLocation::Url`]; `file://` URIs and
    /// anything else are treated as a local path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceLocation::Url(trimmed.to_string())
        } else if lower.starts_with("file://") {
            SourceLocation::File(PathBuf::from(&trimmed["file://".len()..]))
        } else {
            SourceLocation::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Url(url) => f.write_str(url),
            SourceLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetched document content plus optional fetch metadata.
#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    pub body: Vec<u8>,
    /// HTTP status, when the document came over the network.
    pub status: Option<u16>,
    pub content_type: Option<String>,
}

impl RawDocument {
    /// Wrap markup that was obtained without a fetcher.
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            body: html.into().into_bytes(),
            status: None,
            content_type: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Borrow the body as text.
    pub fn text(&self) -> Result<&str, ExtractError> {
        std::str::from_utf8(&self.body).map_err(|e| ExtractError::Undecodable(e.to_string()))
    }
}

/// One extracted user review.
///
/// Emitted only when at least one of `title` or `text` is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReviewRecord {
    pub rating: Option<u32>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub author: Option<String>,
    /// Raw date text as rendered on the page.
    pub date: Option<String>,
    #[serde(default)]
    pub is_spoiler: bool,
}

impl ReviewRecord {
    /// Whether this record carries enough content to be kept.
    pub fn is_viable(&self) -> bool {
        self.title.is_some() || self.text.is_some()
    }
}

/// Output of the fetch → extract pipeline.
#[derive(Debug, Clone)]
pub struct ScrapeResult {
    pub reviews: Vec<ReviewRecord>,
    /// SHA-256 of the fetched markup
    pub content_hash: String,
}

/// Compute a SHA-256 hash of bytes, returned as 64-char hex.
pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Join the body text of every review that has one, separated by single spaces.
pub fn combined_text(reviews: &[ReviewRecord]) -> String {
    reviews
        .iter()
        .filter_map(|r| r.text.as_deref())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
