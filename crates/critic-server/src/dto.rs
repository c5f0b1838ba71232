use serde::{Deserialize, Serialize};

use critic_core::models::ReviewRecord;

// ---------------------------------------------------------------------------
// Scrape
// ---------------------------------------------------------------------------

/// Either a page URL to fetch or markup supplied directly.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ScrapeRequest {
    pub url: Option<String>,
    pub html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReviewDto {
    pub rating: Option<u32>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub is_spoiler: bool,
}

impl From<ReviewRecord> for ReviewDto {
    fn from(record: ReviewRecord) -> Self {
        Self {
            rating: record.rating,
            title: record.title,
            text: record.text,
            author: record.author,
            date: record.date,
            is_spoiler: record.is_spoiler,
        }
    }
}

impl From<ReviewDto> for ReviewRecord {
    fn from(dto: ReviewDto) -> Self {
        Self {
            rating: dto.rating,
            title: dto.title,
            text: dto.text,
            author: dto.author,
            date: dto.date,
            is_spoiler: dto.is_spoiler,
        }
    }
}

// ---------------------------------------------------------------------------
// Analyze
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub reviews: Vec<ReviewDto>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    /// Free-text title query
    pub s: Option<String>,
}

// ---------------------------------------------------------------------------
// Health / errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub summarizer: bool,
    pub search: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
