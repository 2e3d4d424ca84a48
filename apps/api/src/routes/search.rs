//! Search endpoints: trigger a pipeline invocation, read the latest outcome.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{SearchCriteria, SearchOutcome};
use crate::search::pipeline::run_search;
use crate::state::AppState;

/// POST /api/v1/search request body: the criteria plus an optional
/// per-request forced-fallback override (testing switch).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(flatten)]
    pub criteria: SearchCriteria,
    #[serde(default)]
    pub force_fallback: bool,
}

/// POST /api/v1/search
/// Runs the pipeline and publishes the outcome under a fresh invocation
/// token; a search started later always wins the shared result slot.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchOutcome>, AppError> {
    if request.criteria.location.trim().is_empty() {
        return Err(AppError::Validation("location must not be empty".into()));
    }

    let token = state.session.begin();
    let force = state.config.force_fallback || request.force_fallback;
    let outcome = run_search(state.backend.as_ref(), force, &request.criteria).await;
    state.session.publish(token, outcome.clone()).await;

    Ok(Json(outcome))
}

/// GET /api/v1/search/latest
/// Most recently published outcome, for collaborators that poll.
pub async fn handle_latest(
    State(state): State<AppState>,
) -> Result<Json<SearchOutcome>, AppError> {
    state
        .session
        .latest()
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("no search has completed yet".into()))
}
