//! Invocation tokens for re-entrant searches.
//!
//! A fresh search cancels interest in the prior one's eventual result:
//! tokens increase monotonically and only the holder of the current token
//! may publish into the shared result slot (last-write-wins). Stale
//! completions are discarded, never interleaved.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::debug;

use crate::models::SearchOutcome;

#[derive(Default)]
pub struct SearchSession {
    counter: AtomicU64,
    latest: RwLock<Option<(u64, SearchOutcome)>>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the next invocation token, invalidating all prior ones.
    pub fn begin(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publishes an outcome if `token` is still the current invocation.
    /// Returns false (and discards the outcome) when a newer search has
    /// started since `token` was issued.
    pub async fn publish(&self, token: u64, outcome: SearchOutcome) -> bool {
        if token != self.counter.load(Ordering::SeqCst) {
            debug!("discarding stale search result (token {token})");
            return false;
        }
        *self.latest.write().await = Some((token, outcome));
        true
    }

    /// Most recently published outcome, if any search has completed.
    pub async fn latest(&self) -> Option<SearchOutcome> {
        self.latest.read().await.as_ref().map(|(_, o)| o.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResultSource;
    use crate::search::fallback::fallback_listings;

    fn outcome(notice: &str) -> SearchOutcome {
        SearchOutcome {
            ok: false,
            source: ResultSource::Fallback,
            listings: fallback_listings(),
            insights: None,
            kind: None,
            notice: Some(notice.into()),
        }
    }

    #[tokio::test]
    async fn test_tokens_increase_monotonically() {
        let session = SearchSession::new();
        let a = session.begin();
        let b = session.begin();
        assert!(b > a);
    }

    #[tokio::test]
    async fn test_current_token_publishes() {
        let session = SearchSession::new();
        let token = session.begin();
        assert!(session.publish(token, outcome("first")).await);
        let latest = session.latest().await.unwrap();
        assert_eq!(latest.notice.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_stale_token_is_discarded() {
        let session = SearchSession::new();
        let stale = session.begin();
        let current = session.begin();
        assert!(session.publish(current, outcome("current")).await);
        // The older invocation finishes late; its result must not clobber.
        assert!(!session.publish(stale, outcome("stale")).await);
        let latest = session.latest().await.unwrap();
        assert_eq!(latest.notice.as_deref(), Some("current"));
    }

    #[tokio::test]
    async fn test_latest_is_none_before_any_completion() {
        let session = SearchSession::new();
        session.begin();
        assert!(session.latest().await.is_none());
    }
}
