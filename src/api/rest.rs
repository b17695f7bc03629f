//! REST API router.

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    ai_query_handler, create_query_handler, current_user_handler, get_advisory_handler,
    list_advisories_handler, list_queries_handler, login_handler, logout_handler,
    rate_query_handler, register_handler, update_profile_handler, ApiState,
};
use crate::auth::AuthLayer;
use crate::config::ServerConfig;

/// Create the REST API router.
///
/// Endpoints:
/// - GET   /health                 - Liveness probe
/// - GET   /                       - API info
/// - POST  /api/register           - Create an account
/// - POST  /api/login              - Start a session
/// - POST  /api/logout             - End the session
/// - GET   /api/user               - Current profile
/// - PATCH /api/user/profile       - Update profile fields
/// - GET   /api/advisories         - Advisory feed
/// - GET   /api/advisories/:id     - One advisory
/// - GET   /api/queries            - Caller's query history
/// - POST  /api/queries            - Create a raw query record
/// - POST  /api/queries/ai         - Ask the AI advisor
/// - PATCH /api/queries/:id        - Rate a query
pub fn create_router(state: Arc<ApiState>, config: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/user", get(current_user_handler))
        .route("/user/profile", patch(update_profile_handler))
        .route("/advisories", get(list_advisories_handler))
        .route("/advisories/:id", get(get_advisory_handler))
        .route("/queries", get(list_queries_handler).post(create_query_handler))
        .route("/queries/ai", post(ai_query_handler))
        .route("/queries/:id", patch(rate_query_handler))
        .with_state(state.clone());

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/", get(api_info_handler))
        .nest("/api", api_routes)
        .layer(AuthLayer::new(state.authenticator.clone()))
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_origin(Any);

        router.layer(cors)
    } else {
        router
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Root handler with basic info.
async fn api_info_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "krishi",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "AI agricultural advisory server for Kerala farmers",
        "endpoints": {
            "advisories": "/api/advisories",
            "queries": "/api/queries",
            "ai": "/api/queries/ai"
        }
    }))
}
