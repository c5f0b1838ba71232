use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use critic_server::routes::CONTENT_HASH_HEADER;

use crate::common::{
    REVIEW_PAGE, TEST_LLM_KEY, TEST_OMDB_KEY, body_json, json_request, send, setup_test_app,
    setup_unconfigured_app,
};

#[tokio::test]
async fn health_reports_configured_services() {
    let upstream = MockServer::start().await;

    let response = send(
        setup_test_app(&upstream),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["summarizer"], true);
    assert_eq!(json["search"], true);

    let response = send(
        setup_unconfigured_app(),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["summarizer"], false);
    assert_eq!(json["search"], false);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let response = send(
        setup_unconfigured_app(),
        Request::get("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["paths"]["/scrape"].is_object());
    assert!(json["paths"]["/api/search"].is_object());
}

// ---------------------------------------------------------------------------
// /scrape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scrape_inline_html_returns_reviews_in_order() {
    let response = send(
        setup_unconfigured_app(),
        json_request("POST", "/scrape", json!({ "html": REVIEW_PAGE })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_HASH_HEADER].to_str().unwrap(),
        critic_core::compute_hash(REVIEW_PAGE.as_bytes())
    );

    let json = body_json(response).await;
    let reviews = json.as_array().unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0]["rating"], 9);
    assert_eq!(reviews[0]["title"], "Masterpiece");
    assert_eq!(reviews[0]["text"], "Best heist film ever made.");
    assert_eq!(reviews[0]["is_spoiler"], false);
    assert!(reviews[1]["rating"].is_null());
    assert_eq!(reviews[1]["title"], "Too long");
}

#[tokio::test]
async fn scrape_url_fetches_with_browser_headers() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/title/tt0113277/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REVIEW_PAGE))
        .expect(1)
        .mount(&upstream)
        .await;

    let url = format!("{}/title/tt0113277/reviews", upstream.uri());
    let response = send(
        setup_test_app(&upstream),
        json_request("POST", "/scrape", json!({ "url": url })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let requests = upstream.received_requests().await.unwrap();
    let accept_language = requests[0]
        .headers
        .get("accept-language")
        .and_then(|v| v.to_str().ok());
    assert_eq!(accept_language, Some("en-US,en;q=0.9"));
    assert!(requests[0].headers.contains_key("user-agent"));
}

#[tokio::test]
async fn scrape_page_without_reviews_returns_no_content() {
    let response = send(
        setup_unconfigured_app(),
        json_request(
            "POST",
            "/scrape",
            json!({ "html": "<html><body><p>No reviews yet</p></body></html>" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test]
async fn scrape_requires_url_or_html() {
    let response = send(
        setup_unconfigured_app(),
        json_request("POST", "/scrape", json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "validation_error");

    let response = send(
        setup_unconfigured_app(),
        json_request(
            "POST",
            "/scrape",
            json!({ "url": "https://example.com", "html": REVIEW_PAGE }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn scrape_upstream_error_is_fetch_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;

    let response = send(
        setup_test_app(&upstream),
        json_request("POST", "/scrape", json!({ "url": upstream.uri() })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "fetch_error");
}

#[tokio::test]
async fn scrape_private_address_is_blocked_by_default() {
    let response = send(
        setup_unconfigured_app(),
        json_request(
            "POST",
            "/scrape",
            json!({ "url": "http://127.0.0.1:9/reviews" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn scrape_tag_free_text_returns_no_content() {
    let response = send(
        setup_unconfigured_app(),
        json_request("POST", "/scrape", json!({ "html": "just some plain text" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn scrape_empty_upstream_body_is_extract_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&upstream)
        .await;

    let response = send(
        setup_test_app(&upstream),
        json_request("POST", "/scrape", json!({ "url": upstream.uri() })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "extract_error");
}

// ---------------------------------------------------------------------------
// /analyze
// ---------------------------------------------------------------------------

#[tokio::test]
async fn analyze_sends_combined_text_to_llm() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", format!("Bearer {TEST_LLM_KEY}").as_str()))
        .and(body_partial_json(json!({
            "messages": [{
                "role": "user",
                "content": "Analyze these movie reviews and provide key insights: Loved it. Too long."
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Mixed reactions."}}]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let response = send(
        setup_test_app(&upstream),
        json_request(
            "POST",
            "/analyze",
            json!({ "reviews": [
                { "title": "A", "text": "Loved it." },
                { "title": "B" },
                { "text": "Too long." }
            ]}),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["analysis"], "Mixed reactions.");
}

#[tokio::test]
async fn analyze_rejects_empty_reviews() {
    let upstream = MockServer::start().await;
    let response = send(
        setup_test_app(&upstream),
        json_request("POST", "/analyze", json!({ "reviews": [] })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_without_key_is_config_error() {
    let response = send(
        setup_unconfigured_app(),
        json_request("POST", "/analyze", json!({ "reviews": [{ "text": "Fine" }] })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "config_error");
}

#[tokio::test]
async fn analyze_llm_rate_limit_is_429() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&upstream)
        .await;

    let response = send(
        setup_test_app(&upstream),
        json_request("POST", "/analyze", json!({ "reviews": [{ "text": "Fine" }] })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

// ---------------------------------------------------------------------------
// /api/search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_passes_upstream_json_through() {
    let upstream = MockServer::start().await;
    let body = json!({
        "Search": [{ "Title": "Heat", "Year": "1995", "imdbID": "tt0113277" }],
        "totalResults": "1",
        "Response": "True"
    });
    Mock::given(method("GET"))
        .and(path("/omdb/"))
        .and(query_param("apikey", TEST_OMDB_KEY))
        .and(query_param("s", "heat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&upstream)
        .await;

    let response = send(
        setup_test_app(&upstream),
        Request::get("/api/search?s=heat").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, body);
}

#[tokio::test]
async fn search_requires_query() {
    let upstream = MockServer::start().await;
    let response = send(
        setup_test_app(&upstream),
        Request::get("/api/search").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_without_key_is_config_error() {
    let response = send(
        setup_unconfigured_app(),
        Request::get("/api/search?s=heat").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
