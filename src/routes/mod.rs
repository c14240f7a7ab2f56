//! Router assembly

pub mod api;

use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::api::{health_check, not_found};
use crate::middleware::seo_files_middleware;
use crate::state::AppState;
use std::sync::Arc;

/// Builds the complete application router
///
/// - `GET /` health check
/// - `/api/seo/*` verification workflow and dashboard
/// - `/sitemap.xml`, `/robots.txt` and `/google<token>.html` served by the SEO
///   file middleware, which wraps every route including the fallback
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .nest("/api/seo", api::create_api_router())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            seo_files_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
