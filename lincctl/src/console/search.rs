//! Debounced, cancellable user search for contact pickers.
//!
//! Every keystroke bumps a generation counter and cancels the pending timer. After the quiet
//! period the search runs, and its results are published on a [`watch`] channel only if no newer
//! keystroke arrived in the meantime. A slow response to an old query therefore never replaces
//! the results of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::api::models::users::UserSummary;
use crate::config::SearchConfig;
use crate::errors::{Error, Result};
use crate::services::Users;

/// Backend that answers a user search.
#[async_trait]
pub trait UserSearch: Send + Sync + 'static {
    async fn search_users(&self, query: &str, limit: u32) -> Result<Vec<UserSummary>>;
}

#[async_trait]
impl UserSearch for ApiClient {
    async fn search_users(&self, query: &str, limit: u32) -> Result<Vec<UserSummary>> {
        Users::new(self).search(query, limit).await
    }
}

/// What the picker should currently show.
#[derive(Debug, Clone, Default)]
pub enum SearchState {
    /// Nothing to show: no query, or one too short to search.
    #[default]
    Idle,
    /// Waiting for the quiet period to pass or for the response.
    Pending { query: String },
    Results { query: String, users: Vec<UserSummary> },
    /// The search call failed; `error` is the backend's error as returned.
    Failed { query: String, error: Arc<Error> },
}

impl SearchState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, SearchState::Pending { .. })
    }
}

impl PartialEq for SearchState {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Idle, Self::Idle) => true,
            (Self::Pending { query: a }, Self::Pending { query: b }) => a == b,
            (Self::Results { query: a, users: x }, Self::Results { query: b, users: y }) => a == b && x == y,
            (Self::Failed { query: a, error: x }, Self::Failed { query: b, error: y }) => {
                a == b && x.user_message() == y.user_message()
            }
            _ => false,
        }
    }
}

pub struct DebouncedSearch<S> {
    searcher: Arc<S>,
    config: SearchConfig,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<SearchState>>,
    pending: Mutex<Option<CancellationToken>>,
    shutdown: CancellationToken,
}

impl<S: UserSearch> DebouncedSearch<S> {
    pub fn new(searcher: Arc<S>, config: SearchConfig) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            searcher,
            config,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
            pending: Mutex::new(None),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Record a new query and (re)start the debounce timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_input(&self, query: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel_pending();

        let query = query.trim().to_string();
        if query.chars().count() < self.config.min_query_length {
            self.state.send_replace(SearchState::Idle);
            return;
        }
        if self.shutdown.is_cancelled() {
            return;
        }

        let token = self.shutdown.child_token();
        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(token.clone());
        }
        self.state.send_replace(SearchState::Pending { query: query.clone() });

        let searcher = Arc::clone(&self.searcher);
        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.generation);
        let debounce = self.config.debounce;
        let limit = self.config.result_limit;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(generation, "Search timer cancelled");
                    return;
                }
                _ = tokio::time::sleep(debounce) => {}
            }

            let next = match searcher.search_users(&query, limit).await {
                Ok(users) => SearchState::Results { query, users },
                Err(e) => {
                    warn!(error = %e, "User search failed");
                    SearchState::Failed {
                        query,
                        error: Arc::new(e),
                    }
                }
            };

            // Checked under the channel's write lock so a newer keystroke cannot slip in between.
            let published = state.send_if_modified(|current| {
                if latest.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *current = next;
                true
            });
            if !published {
                debug!(generation, "Discarding stale search results");
            }
        });
    }

    /// Drop the query and any pending search.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cancel_pending();
        self.state.send_replace(SearchState::Idle);
    }

    /// Cancel everything; later input is ignored.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        self.clear();
    }

    fn cancel_pending(&self) {
        if let Ok(mut pending) = self.pending.lock()
            && let Some(token) = pending.take()
        {
            token.cancel();
        }
    }
}

impl<S> Drop for DebouncedSearch<S> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::PersonalDetails;
    use std::collections::HashMap;
    use std::time::Duration;
    use uuid::Uuid;

    /// Records every query and answers after a per-query delay.
    #[derive(Default)]
    struct FakeSearch {
        calls: Mutex<Vec<String>>,
        delays: HashMap<String, Duration>,
    }

    impl FakeSearch {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UserSearch for FakeSearch {
        async fn search_users(&self, query: &str, _limit: u32) -> Result<Vec<UserSummary>> {
            self.calls.lock().unwrap().push(query.to_string());
            if let Some(delay) = self.delays.get(query) {
                tokio::time::sleep(*delay).await;
            }
            Ok(vec![UserSummary {
                id: Uuid::new_v4(),
                username: query.to_uppercase(),
                personal_details: PersonalDetails {
                    full_name: Some(format!("Match for {query}")),
                    ..Default::default()
                },
                status: None,
            }])
        }
    }

    fn search(fake: FakeSearch) -> (Arc<FakeSearch>, DebouncedSearch<FakeSearch>) {
        let fake = Arc::new(fake);
        let search = DebouncedSearch::new(Arc::clone(&fake), SearchConfig::default());
        (fake, search)
    }

    fn results_query(state: &SearchState) -> Option<&str> {
        match state {
            SearchState::Results { query, .. } => Some(query),
            _ => None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_keystroke_searches() {
        let (fake, search) = search(FakeSearch::default());
        let mut rx = search.subscribe();

        search.on_input("j");
        search.on_input("ja");
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.on_input("jan");
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.on_input("jane");

        let state = rx.wait_for(SearchState::is_settled).await.unwrap().clone();
        assert_eq!(results_query(&state), Some("jane"));
        assert_eq!(fake.calls(), vec!["jane".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_resets_without_request() {
        let (fake, search) = search(FakeSearch::default());
        search.on_input("jane");
        search.on_input("j");
        assert_eq!(search.current(), SearchState::Idle);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(fake.calls().is_empty());
        assert_eq!(search.current(), SearchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let fake = FakeSearch {
            delays: HashMap::from([("slow".to_string(), Duration::from_secs(2))]),
            ..Default::default()
        };
        let (fake, search) = search(fake);
        let mut rx = search.subscribe();

        search.on_input("slow");
        // Timer fires, the slow request is now in flight.
        tokio::time::sleep(Duration::from_millis(600)).await;
        search.on_input("fast");

        let state = rx.wait_for(SearchState::is_settled).await.unwrap().clone();
        assert_eq!(results_query(&state), Some("fast"));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(results_query(&search.current()), Some("fast"));
        assert_eq!(fake.calls(), vec!["slow".to_string(), "fast".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_timer() {
        let (fake, search) = search(FakeSearch::default());
        search.on_input("jane");
        search.shutdown();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(fake.calls().is_empty());
        assert_eq!(search.current(), SearchState::Idle);

        search.on_input("jane");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(fake.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_published() {
        struct Broken;

        #[async_trait]
        impl UserSearch for Broken {
            async fn search_users(&self, _query: &str, _limit: u32) -> Result<Vec<UserSummary>> {
                Err(Error::Forbidden {
                    message: "Not allowed".to_string(),
                })
            }
        }

        let search = DebouncedSearch::new(Arc::new(Broken), SearchConfig::default());
        let mut rx = search.subscribe();
        search.on_input("jane");

        let state = rx.wait_for(SearchState::is_settled).await.unwrap().clone();
        match state {
            SearchState::Failed { query, error } => {
                assert_eq!(query, "jane");
                assert!(matches!(*error, Error::Forbidden { ref message } if message == "Not allowed"));
            }
            other => panic!("unexpected state {other:?}"),
        }
    }
}
