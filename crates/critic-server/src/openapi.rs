use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Critic API",
        version = "0.1.0",
        description = "Movie review extraction, summarization and title search."
    ),
    paths(
        crate::routes::scrape,
        crate::routes::analyze,
        crate::routes::search,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::ScrapeRequest,
        crate::dto::ReviewDto,
        crate::dto::AnalyzeRequest,
        crate::dto::AnalyzeResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "reviews", description = "Review extraction and analysis"),
        (name = "search", description = "Title search"),
        (name = "system", description = "Health and system status"),
    )
)]
pub struct ApiDoc;
