//! Debounced location search with a superseded-by-newer-request guard
//!
//! Each query takes a ticket from a monotonic sequence counter, sleeps the
//! debounce window, and checks the counter again before issuing the
//! request AND before publishing the response. A response whose ticket is
//! no longer the latest is dropped, so an older, slower response can never
//! overwrite state produced by a newer query. Superseded work is not
//! cancelled; it just loses the ticket comparison and returns quietly.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::observability::Metrics;

use super::client::{GeocodeProvider, Place};

/// Outcome of a single debounced query
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// This query was the latest when its response arrived
    Fresh(Vec<Place>),
    /// A newer query was issued; the result (if any) was discarded
    Superseded,
}

pub struct SearchSession {
    provider: Arc<dyn GeocodeProvider>,
    metrics: Arc<Metrics>,
    debounce: Duration,
    min_query_len: usize,
    max_results: usize,
    latest: AtomicU64,
    results: Mutex<Vec<Place>>,
}

impl SearchSession {
    pub fn new(
        provider: Arc<dyn GeocodeProvider>,
        metrics: Arc<Metrics>,
        debounce: Duration,
        min_query_len: usize,
        max_results: usize,
    ) -> Self {
        Self {
            provider,
            metrics,
            debounce,
            min_query_len,
            max_results,
            latest: AtomicU64::new(0),
            results: Mutex::new(Vec::new()),
        }
    }

    /// Run one debounced query. Queries below the minimum length clear the
    /// visible result list without touching the network; provider failures
    /// degrade to an empty list.
    pub async fn query(&self, input: &str) -> SearchOutcome {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let trimmed = input.trim().to_string();

        if trimmed.chars().count() < self.min_query_len {
            self.publish(ticket, Vec::new())
        } else {
            self.metrics.search_issued();

            tokio::time::sleep(self.debounce).await;
            if self.latest.load(Ordering::SeqCst) != ticket {
                debug!(%trimmed, "Query superseded during debounce window");
                return SearchOutcome::Superseded;
            }

            let places = match self.provider.search(&trimmed, self.max_results).await {
                Ok(places) => places,
                Err(error) => {
                    warn!(%error, query = %trimmed, "Location search failed");
                    Vec::new()
                }
            };

            self.publish(ticket, places)
        }
    }

    /// The most recently published result list
    pub fn current(&self) -> Vec<Place> {
        self.lock_results().clone()
    }

    fn publish(&self, ticket: u64, places: Vec<Place>) -> SearchOutcome {
        if self.latest.load(Ordering::SeqCst) != ticket {
            self.metrics.stale_result_dropped();
            return SearchOutcome::Superseded;
        }

        *self.lock_results() = places.clone();
        SearchOutcome::Fresh(places)
    }

    fn lock_results(&self) -> std::sync::MutexGuard<'_, Vec<Place>> {
        self.results
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::client::{GeocodeError, Result as GeocodeResult};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct FakeProvider {
        delay: Duration,
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeProvider {
        fn instant() -> Self {
            Self {
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay,
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GeocodeProvider for FakeProvider {
        async fn search(&self, query: &str, _limit: usize) -> GeocodeResult<Vec<Place>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;

            if self.fail {
                return Err(GeocodeError::RequestFailed("boom".to_string()));
            }

            Ok(vec![Place {
                description: format!("{query}, Somewhere"),
                place_id: "1".to_string(),
                lat: "0".to_string(),
                lon: "0".to_string(),
                main_text: query.to_string(),
                secondary_text: "Somewhere".to_string(),
            }])
        }
    }

    fn session(provider: Arc<FakeProvider>) -> SearchSession {
        SearchSession::new(
            provider,
            Arc::new(Metrics::new()),
            Duration::from_millis(20),
            2,
            5,
        )
    }

    #[tokio::test]
    async fn fresh_query_publishes_results() {
        let provider = Arc::new(FakeProvider::instant());
        let session = session(provider);

        let outcome = session.query("Paris").await;
        match outcome {
            SearchOutcome::Fresh(places) => {
                assert_eq!(places.len(), 1);
                assert_eq!(places[0].main_text, "Paris");
            }
            other => panic!("expected fresh results, got {other:?}"),
        }
        assert_eq!(session.current().len(), 1);
    }

    #[tokio::test]
    async fn short_queries_clear_without_network() {
        let provider = Arc::new(FakeProvider::instant());
        let session = session(Arc::clone(&provider));

        session.query("Paris").await;
        assert_eq!(session.current().len(), 1);

        let outcome = session.query("P").await;
        assert_eq!(outcome, SearchOutcome::Fresh(Vec::new()));
        assert!(session.current().is_empty());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn newer_query_supersedes_older_in_flight_response() {
        let provider = Arc::new(FakeProvider::slow(Duration::from_millis(100)));
        let session = Arc::new(session(Arc::clone(&provider)));

        let older = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.query("Paris").await })
        };
        // Let the older query pass its debounce window and start its request
        tokio::time::sleep(Duration::from_millis(40)).await;

        let newer = session.query("Berlin").await;
        let older = older.await.unwrap();

        assert_eq!(older, SearchOutcome::Superseded);
        match newer {
            SearchOutcome::Fresh(places) => assert_eq!(places[0].main_text, "Berlin"),
            other => panic!("expected fresh results, got {other:?}"),
        }
        // The visible list reflects the newer query, never the older one
        assert_eq!(session.current()[0].main_text, "Berlin");
    }

    #[tokio::test]
    async fn superseded_during_debounce_never_issues_request() {
        let provider = Arc::new(FakeProvider::instant());
        let session = Arc::new(session(Arc::clone(&provider)));

        let older = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.query("Par").await })
        };
        // Let the older query take its ticket, then supersede it while it
        // is still inside the debounce window
        tokio::time::sleep(Duration::from_millis(5)).await;
        let newer = session.query("Paris").await;
        let older = older.await.unwrap();

        assert_eq!(older, SearchOutcome::Superseded);
        assert!(matches!(newer, SearchOutcome::Fresh(_)));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_empty_list() {
        let provider = Arc::new(FakeProvider::failing());
        let session = session(provider);

        let outcome = session.query("Paris").await;
        assert_eq!(outcome, SearchOutcome::Fresh(Vec::new()));
        assert!(session.current().is_empty());
    }
}
