// Presentation layer - HTTP surface for the console
pub mod app_state;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    daily_summary, get_dashboard, get_snapshot, health_check, list_documents, query_knowledge,
    refresh_dashboard,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/refresh", post(refresh_dashboard))
        .route("/dashboard/snapshot", get(get_snapshot))
        .route("/knowledge/query", post(query_knowledge))
        .route("/knowledge/summary", get(daily_summary))
        .route("/knowledge/documents", get(list_documents))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
