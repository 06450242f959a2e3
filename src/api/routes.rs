use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Single action endpoint: ?action=recommend|add_user|add_article|load_datasets
        .route("/api/recommender", get(handlers::dispatch))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// Resource-style routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/:user_id/recommendations",
            get(handlers::get_recommendations),
        )
        .route("/users", post(handlers::create_user))
        .route("/articles", post(handlers::create_article))
        .route("/datasets", get(handlers::get_datasets))
        .route("/datasets/reload", post(handlers::reload_datasets))
}
