//! Search orchestration: debounce, search cycle, trending load.
//!
//! Owns all UI-facing state and sequences the two collaborators. The
//! catalog drives visible state; analytics runs in the background and
//! its failures are swallowed after logging.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::clients::{CatalogError, CatalogSource};
use crate::models::{Movie, SearchRecord};
use crate::services::AnalyticsStore;

const FETCH_ERROR_MESSAGE: &str = "Error fetching movies. Please try again later.";

/// UI-facing state, readable as a snapshot at any time.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Raw input text, updated on every edit.
    pub query: String,

    /// Last query that survived the debounce window.
    pub debounced_query: String,

    pub results: Vec<Movie>,

    pub trending: Vec<SearchRecord>,

    pub is_loading: bool,

    /// User-visible message from the last failed search, cleared when a
    /// new cycle starts.
    pub error_message: Option<String>,

    pub is_trending_loading: bool,
}

#[derive(Clone)]
pub struct SearchOrchestrator {
    catalog: Arc<dyn CatalogSource>,
    analytics: Arc<dyn AnalyticsStore>,
    state: Arc<RwLock<SearchState>>,
    debounce: Duration,
    trending_limit: usize,

    /// Pending debounce timer; a new edit aborts it (last write wins).
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,

    /// Search cycles and analytics records already issued. Never
    /// cancelled once started, so a late response to a stale query can
    /// still overwrite `results` (whichever resolves last wins).
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl SearchOrchestrator {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        analytics: Arc<dyn AnalyticsStore>,
        debounce: Duration,
        trending_limit: usize,
    ) -> Self {
        Self {
            catalog,
            analytics,
            state: Arc::new(RwLock::new(SearchState::default())),
            debounce,
            trending_limit,
            pending: Arc::new(Mutex::new(None)),
            in_flight: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a copy of the current UI state.
    pub async fn snapshot(&self) -> SearchState {
        self.state.read().await.clone()
    }

    /// Handles one edit of the query text.
    ///
    /// `query` is visible immediately; `debounced_query` only changes
    /// after the configured quiet window, and an edit inside the window
    /// discards the previously pending propagation entirely.
    pub async fn on_query_changed(&self, text: &str) {
        self.state.write().await.query = text.to_string();

        let this = self.clone();
        let query = text.to_string();

        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(this.debounce).await;

            this.state.write().await.debounced_query = query.clone();

            // Spawn and register in one lock scope; an abort landing
            // between the two would leave a running search that
            // settle() cannot join.
            let mut in_flight = this.in_flight.lock().await;
            let searcher = this.clone();
            in_flight.push(tokio::spawn(async move {
                searcher.run_search(&query).await;
            }));
        }));
    }

    /// Loads the trending list. Runs once at startup and is not
    /// re-triggered by search activity.
    pub async fn on_startup(&self) {
        self.state.write().await.is_trending_loading = true;

        match self.analytics.trending(self.trending_limit).await {
            Ok(records) => self.state.write().await.trending = records,
            Err(err) => warn!("Failed to load trending searches: {err}"),
        }

        self.state.write().await.is_trending_loading = false;
    }

    /// One search cycle for an already-debounced query.
    async fn run_search(&self, query: &str) {
        {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.error_message = None;
        }

        match self.catalog.search_movies(query).await {
            Ok(movies) => {
                if !query.is_empty()
                    && let Some(first) = movies.first()
                {
                    self.spawn_record(query, first.clone()).await;
                }

                // Empty list clears the display; that is not an error.
                self.state.write().await.results = movies;
            }
            Err(err) => {
                let message = match err {
                    CatalogError::Api(message) => message,
                    other => {
                        error!("Catalog search for '{query}' failed: {other}");
                        FETCH_ERROR_MESSAGE.to_string()
                    }
                };

                let mut state = self.state.write().await;
                state.results.clear();
                state.error_message = Some(message);
            }
        }

        self.state.write().await.is_loading = false;
    }

    /// Fire-and-forget analytics record. The result never feeds back
    /// into visible state; a failure is logged and dropped.
    async fn spawn_record(&self, term: &str, first_result: Movie) {
        let analytics = Arc::clone(&self.analytics);
        let term = term.to_string();

        let mut in_flight = self.in_flight.lock().await;
        in_flight.push(tokio::spawn(async move {
            if let Err(err) = analytics.record_search(&term, &first_result).await {
                warn!("Failed to record search '{term}': {err}");
            }
        }));
    }

    /// Waits until the pending debounce propagation (if any) and every
    /// already-issued background task have finished. Host convenience;
    /// the UI contract never requires it.
    pub async fn settle(&self) {
        let pending = self.pending.lock().await.take();
        if let Some(handle) = pending {
            let _ = handle.await;
        }

        loop {
            let handles: Vec<_> = self.in_flight.lock().await.drain(..).collect();
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                let _ = handle.await;
            }
        }
    }
}
