//! HTTP surface of the dashboard backend.

pub mod error;
pub mod rest;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use state::AppState;

/// Builds the application router with tracing and CORS applied.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auto-reply", post(rest::auto_reply_handler))
        .route("/auto-reply/status", get(rest::status_handler))
        .route("/auto-reply/toggle", post(rest::toggle_handler))
        .route(
            "/auto-reply/templates",
            get(rest::list_templates_handler).post(rest::create_template_handler),
        )
        .route(
            "/auto-reply/templates/{id}/active",
            post(rest::set_template_active_handler),
        )
        .route("/auto-reply/platforms", put(rest::update_platform_handler))
        .route("/vip-analysis", post(rest::vip_analysis_handler))
        .route("/campaigns/health", post(rest::campaign_health_handler))
        .route("/sessions/analyze", post(rest::session_analysis_handler));

    Router::new()
        .route("/health", get(rest::health_handler))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}
