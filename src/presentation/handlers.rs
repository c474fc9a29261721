// HTTP request handlers
use crate::application::knowledge_service::KnowledgeError;
use crate::domain::snapshot::DashboardSnapshot;
use crate::domain::view::DerivedView;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct KnowledgeQueryBody {
    pub query: String,
    pub top_k: Option<u32>,
}

#[derive(Deserialize)]
pub struct DocumentSearch {
    pub search: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Derived view of the currently visible snapshot
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DerivedView> {
    Json(state.console.derived_view().await)
}

/// Re-fetch every source, then return the resulting view
pub async fn refresh_dashboard(State(state): State<Arc<AppState>>) -> Json<DerivedView> {
    state.console.refresh().await;
    Json(state.console.derived_view().await)
}

pub async fn get_snapshot(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    let snapshot = state.console.latest_snapshot().await;
    Json(snapshot.as_ref().clone())
}

pub async fn query_knowledge(
    State(state): State<Arc<AppState>>,
    Json(body): Json<KnowledgeQueryBody>,
) -> Response {
    match state.knowledge_service.query(&body.query, body.top_k).await {
        Ok(answer) => Json(answer).into_response(),
        Err(e) => knowledge_error(e),
    }
}

pub async fn daily_summary(State(state): State<Arc<AppState>>) -> Response {
    match state.knowledge_service.daily_summary().await {
        Ok(answer) => Json(answer).into_response(),
        Err(e) => knowledge_error(e),
    }
}

pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DocumentSearch>,
) -> Response {
    match state.knowledge_service.documents(params.search.as_deref()).await {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => knowledge_error(e),
    }
}

fn knowledge_error(e: KnowledgeError) -> Response {
    let status = match e {
        KnowledgeError::EmptyQuery => StatusCode::BAD_REQUEST,
        KnowledgeError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(json!({ "error": e.to_string() }))).into_response()
}
