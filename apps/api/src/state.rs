use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::GenerationBackend;
use crate::search::session::SearchSession;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable generation backend. Production: `GeminiClient`.
    pub backend: Arc<dyn GenerationBackend>,
    pub config: Config,
    /// Invocation-token holder for last-write-wins result publication.
    pub session: Arc<SearchSession>,
}
