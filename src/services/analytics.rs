//! Domain layer for search-popularity analytics.
//!
//! Everything here is background work from the orchestrator's point of
//! view: failures are logged and never surface in the search display.

use crate::clients::StoreError;
use crate::models::{Movie, SearchRecord};

/// Search-tally operations over the hosted document store.
#[async_trait::async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Records one successful search for `term`.
    ///
    /// Increments the term's counter by exactly 1, creating the record
    /// with `count = 1` on first sight. `first_result` supplies the
    /// movie id and poster used when creating.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or store failures.
    async fn record_search(&self, term: &str, first_result: &Movie) -> Result<(), StoreError>;

    /// Returns the top `limit` records ordered by count descending.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or store failures.
    async fn trending(&self, limit: usize) -> Result<Vec<SearchRecord>, StoreError>;
}
