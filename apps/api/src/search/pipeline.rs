//! Search orchestration — the one place the fallback policy lives.
//!
//! Flow: build prompt → generate (grounded) → extract → parse →
//!       (if ≥1 listing) build insights prompt → generate → extract → parse.
//!
//! `run_search` never fails: every pipeline error is converted into the
//! fallback edge with a typed kind and a human-readable notice, so the
//! caller always has listings to render.

use tracing::{debug, info, warn};

use crate::errors::PipelineError;
use crate::llm_client::extract::extract_payload;
use crate::llm_client::GenerationBackend;
use crate::models::{InsightReport, JobListing, ResultSource, SearchCriteria, SearchOutcome};
use crate::search::fallback::{
    fallback_insights, fallback_listings, notice_for, FORCED_FALLBACK_NOTICE,
    INSIGHTS_UNAVAILABLE_NOTICE,
};
use crate::search::parser::{parse_insights, parse_listings};
use crate::search::prompts::{
    build_insights_prompt, build_search_prompt, INSIGHTS_SYSTEM, SEARCH_SYSTEM,
};

/// Runs the full search pipeline for one invocation.
///
/// With `force_fallback` set, no backend call is made at all: the fixed
/// dataset and the canned insight come back deterministically.
pub async fn run_search(
    backend: &dyn GenerationBackend,
    force_fallback: bool,
    criteria: &SearchCriteria,
) -> SearchOutcome {
    if force_fallback {
        debug!("forced fallback mode: skipping live pipeline");
        return SearchOutcome {
            ok: false,
            source: ResultSource::Fallback,
            listings: fallback_listings(),
            insights: Some(fallback_insights()),
            kind: None,
            notice: Some(FORCED_FALLBACK_NOTICE.to_string()),
        };
    }

    match fetch_listings(backend, criteria).await {
        Ok(listings) => {
            info!("search returned {} listing(s)", listings.len());
            // Insight failures degrade independently: the listings we
            // already have are still shown.
            let (insights, notice) =
                match fetch_insights(backend, criteria, listings.len()).await {
                    Ok(report) => (Some(report), None),
                    Err(e) => {
                        warn!("insight stage failed: {e}");
                        (None, Some(INSIGHTS_UNAVAILABLE_NOTICE.to_string()))
                    }
                };
            SearchOutcome {
                ok: true,
                source: ResultSource::Live,
                listings,
                insights,
                kind: None,
                notice,
            }
        }
        Err(e) => {
            warn!("search pipeline failed: {e}");
            SearchOutcome {
                ok: false,
                source: ResultSource::Fallback,
                listings: fallback_listings(),
                insights: None,
                kind: Some(e.kind()),
                notice: Some(notice_for(&e)),
            }
        }
    }
}

async fn fetch_listings(
    backend: &dyn GenerationBackend,
    criteria: &SearchCriteria,
) -> Result<Vec<JobListing>, PipelineError> {
    let prompt = build_search_prompt(criteria);
    let raw = backend.generate(&prompt, SEARCH_SYSTEM, true).await?;
    let candidate = extract_payload(&raw);
    parse_listings(candidate)
}

async fn fetch_insights(
    backend: &dyn GenerationBackend,
    criteria: &SearchCriteria,
    result_count: usize,
) -> Result<InsightReport, PipelineError> {
    let prompt = build_insights_prompt(criteria, result_count);
    let raw = backend.generate(&prompt, INSIGHTS_SYSTEM, false).await?;
    let candidate = extract_payload(&raw);
    parse_insights(candidate)
}
