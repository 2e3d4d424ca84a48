pub mod health;
pub mod search;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/search", post(search::handle_search))
        .route("/api/v1/search/latest", get(search::handle_latest))
        .with_state(state)
}
