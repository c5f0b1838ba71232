use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::MockServer;

use critic_server::config::ServerConfig;
use critic_server::routes;
use critic_server::state::AppState;

pub const TEST_LLM_KEY: &str = "test-llm-key";
pub const TEST_OMDB_KEY: &str = "test-omdb-key";

/// A current-layout review page with two entries.
pub const REVIEW_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
    <article class="user-review-item">
        <span class="ipc-rating-star"><span>9</span><span>/10</span></span>
        <div class="ipc-title"><a class="ipc-title-link-wrapper" href="/review/rw1/"><h3>Masterpiece</h3></a></div>
        <div class="ipc-html-content-inner-div">Best heist film ever made.</div>
    </article>
    <article class="user-review-item">
        <div class="ipc-title"><a class="ipc-title-link-wrapper" href="/review/rw2/"><h3>Too long</h3></a></div>
        <div class="ipc-html-content-inner-div">Needed an edit.</div>
    </article>
</body></html>"#;

/// Router with every upstream pointed at `upstream` and private URLs allowed.
pub fn setup_test_app(upstream: &MockServer) -> Router {
    let config = ServerConfig {
        llm_api_key: Some(TEST_LLM_KEY.to_string()),
        llm_model: "test-model".to_string(),
        llm_base_url: upstream.uri(),
        omdb_api_key: Some(TEST_OMDB_KEY.to_string()),
        omdb_base_url: format!("{}/omdb/", upstream.uri()),
        allow_private_urls: true,
        ..ServerConfig::default()
    };
    build(&config)
}

/// Router with no optional keys and the default SSRF guard.
pub fn setup_unconfigured_app() -> Router {
    build(&ServerConfig::default())
}

fn build(config: &ServerConfig) -> Router {
    let state = AppState::from_config(config).expect("Failed to build app state");
    routes::router(Arc::new(state))
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
