use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use critic_core::AppError;
use critic_core::models::{RawDocument, ReviewRecord, SourceLocation, combined_text};
use critic_core::traits::{Summarizer, TitleSearch};

use crate::dto::{
    AnalyzeRequest, AnalyzeResponse, HealthResponse, ReviewDto, ScrapeRequest, SearchQuery,
};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Response header carrying the SHA-256 of the scraped document.
pub const CONTENT_HASH_HEADER: &str = "x-content-hash";

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/scrape", post(scrape))
        .route("/analyze", post(analyze))
        .route("/api/search", get(search));

    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.merge(api).with_state(state)
}

// ---------------------------------------------------------------------------
// Scrape
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/scrape",
    request_body = ScrapeRequest,
    responses(
        (status = 200, description = "Extracted reviews in page order", body = [ReviewDto]),
        (status = 204, description = "Page contained no review entries"),
        (status = 400, description = "Bad request", body = crate::dto::ErrorResponse),
        (status = 422, description = "Document is empty or not valid UTF-8", body = crate::dto::ErrorResponse),
        (status = 502, description = "Page could not be fetched", body = crate::dto::ErrorResponse),
    ),
    tag = "reviews"
)]
pub async fn scrape(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<ScrapeRequest>,
) -> Result<Response, ApiError> {
    let url = body.url.filter(|u| !u.trim().is_empty());
    let html = body.html.filter(|h| !h.trim().is_empty());

    let result = match (url, html) {
        (Some(url), None) => {
            let location = SourceLocation::Url(url.trim().to_string());
            state.reviews.scrape(&location).await?
        }
        (None, Some(html)) => state.reviews.extract(&RawDocument::from_html(html))?,
        (Some(_), Some(_)) => {
            return Err(AppError::InvalidRequest(
                "Provide either url or html, not both".to_string(),
            )
            .into());
        }
        (None, None) => {
            return Err(AppError::InvalidRequest("URL is required".to_string()).into());
        }
    };

    if result.reviews.is_empty() {
        return Ok((
            StatusCode::NO_CONTENT,
            [(CONTENT_HASH_HEADER, result.content_hash)],
        )
            .into_response());
    }

    let reviews: Vec<ReviewDto> = result.reviews.into_iter().map(ReviewDto::from).collect();
    Ok((
        [(CONTENT_HASH_HEADER, result.content_hash)],
        axum::Json(reviews),
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// Analyze
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Summary of the submitted reviews", body = AnalyzeResponse),
        (status = 400, description = "No reviews supplied", body = crate::dto::ErrorResponse),
        (status = 500, description = "Summarizer not configured", body = crate::dto::ErrorResponse),
        (status = 502, description = "Summarizer failed", body = crate::dto::ErrorResponse),
    ),
    tag = "reviews"
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.reviews.is_empty() {
        return Err(AppError::InvalidRequest("Reviews are required".to_string()).into());
    }

    let summarizer = state.summarizer.as_ref().ok_or_else(|| {
        AppError::ConfigError("CRITIC_LLM_API_KEY must be set for /analyze".to_string())
    })?;

    let records: Vec<ReviewRecord> = body.reviews.into_iter().map(ReviewRecord::from).collect();
    let analysis = summarizer.summarize(&combined_text(&records)).await?;

    Ok(axum::Json(AnalyzeResponse { analysis }))
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Upstream search response, unmodified", body = serde_json::Value),
        (status = 400, description = "Missing query", body = crate::dto::ErrorResponse),
        (status = 500, description = "Search not configured", body = crate::dto::ErrorResponse),
        (status = 502, description = "Upstream search failed", body = crate::dto::ErrorResponse),
    ),
    tag = "search"
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params
        .s
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::InvalidRequest("Search query is required".to_string()))?;

    let client = state.search.as_ref().ok_or_else(|| {
        AppError::ConfigError("OMDB_API_KEY must be set for /api/search".to_string())
    })?;

    let results = client.search(&query).await?;
    Ok(axum::Json(results))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    axum::Json(HealthResponse {
        status: "healthy",
        summarizer: state.summarizer.is_some(),
        search: state.search.is_some(),
    })
}
