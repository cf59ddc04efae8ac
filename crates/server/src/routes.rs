pub mod recipes;

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::response::Envelope;
use crate::state::ServerState;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Last-resort 500 envelope for a handler that panicked.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "handler panicked");
    let body = Envelope::error(INTERNAL_ERROR_MESSAGE, None, None);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Build the application router: health, recipe CRUD, media files and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer, media_root: &str) -> Router {
    // Each recipe route answers with and without the trailing slash
    let recipes = Router::new()
        .route("/recipes", get(recipes::list).post(recipes::create))
        .route("/recipes/", get(recipes::list).post(recipes::create))
        .route(
            "/recipes/:id",
            get(recipes::retrieve).put(recipes::update).patch(recipes::update).delete(recipes::destroy),
        )
        .route(
            "/recipes/:id/",
            get(recipes::retrieve).put(recipes::update).patch(recipes::update).delete(recipes::destroy),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(recipes)
        .nest_service("/media", ServeDir::new(media_root))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
