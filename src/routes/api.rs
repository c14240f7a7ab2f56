use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::seo;
use crate::state::AppState;
use std::sync::Arc;

/// SEO API routes, mounted under `/api/seo`
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/verify", post(seo::verify_handler))
        .route("/dashboard", post(seo::dashboard_handler))
        .layer(TraceLayer::new_for_http())
}
