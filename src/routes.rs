//! Route tables, kept apart from `main` so tests can drive them directly.

use crate::handlers::{self, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

/// Prefix shared by every credit report route.
pub const API_PREFIX: &str = "/api/credit-reports";

/// Report upload, listing and lookup, nested under [`API_PREFIX`].
///
/// `max_upload_bytes` bounds both the raw request body and the multipart
/// extractor's own limit.
pub fn credit_report_routes(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    let routes = Router::new()
        .route("/test", get(handlers::probe))
        .route("/upload/credit-xml", post(handlers::upload_credit_xml))
        .route("/credits", get(handlers::list_credit_reports))
        .route("/credits/:report_id", get(handlers::get_credit_report))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(max_upload_bytes));

    Router::new().nest(API_PREFIX, routes)
}

/// Liveness routes that bypass rate limiting.
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(handlers::health))
}
