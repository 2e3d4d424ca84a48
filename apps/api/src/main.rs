mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod search;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{GeminiClient, GenerationBackend};
use crate::routes::build_router;
use crate::search::session::SearchSession;
use crate::state::AppState;

/// Default filter directive when RUST_LOG is unset, scoped to this binary's
/// tracing target. `module_path!()` is the crate name events are emitted
/// under — a package-name-derived directive would never match it.
fn default_log_filter(level: &str) -> String {
    format!("{}={level}", module_path!())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter(&config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobScout API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the generation backend
    let backend: Arc<dyn GenerationBackend> = Arc::new(GeminiClient::new(&config));
    info!(
        "Generation client initialized (model: {})",
        config.gemini_model
    );
    if config.force_fallback {
        info!("FORCE_FALLBACK is set: all searches serve the sample dataset");
    }

    // Build app state
    let state = AppState {
        backend,
        config: config.clone(),
        session: Arc::new(SearchSession::new()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_targets_the_bin_crate() {
        // Events are emitted under the crate name, not the package name.
        assert_eq!(default_log_filter("info"), "api=info");
    }

    #[test]
    fn test_default_log_filter_is_a_valid_env_filter_directive() {
        assert!(EnvFilter::try_new(default_log_filter("debug")).is_ok());
    }
}
