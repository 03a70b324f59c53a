//! Document-store backed implementation of [`AnalyticsStore`].

use std::sync::Arc;

use crate::clients::{DocumentStore, StoreError};
use crate::models::{Movie, SearchRecord};
use crate::services::analytics::AnalyticsStore;

pub struct HostedAnalyticsStore {
    store: Arc<dyn DocumentStore>,

    /// Image-host prefix the poster path is formatted into.
    image_base_url: String,
}

impl HostedAnalyticsStore {
    #[must_use]
    pub const fn new(store: Arc<dyn DocumentStore>, image_base_url: String) -> Self {
        Self {
            store,
            image_base_url,
        }
    }

    fn poster_url(&self, poster_path: Option<&str>) -> String {
        poster_path
            .map(|path| format!("{}{}", self.image_base_url, path))
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl AnalyticsStore for HostedAnalyticsStore {
    async fn record_search(&self, term: &str, first_result: &Movie) -> Result<(), StoreError> {
        // Read-before-write: two concurrent first searches for the same
        // term can both miss the lookup and both create a record. The
        // store offers no atomic upsert, so the at-most-one-record
        // invariant holds only per logical thread of control.
        match self.store.find_by_term(term).await? {
            Some(existing) => {
                self.store
                    .update_count(&existing.id, existing.count + 1)
                    .await
            }
            None => {
                let record = SearchRecord {
                    search_term: term.to_string(),
                    count: 1,
                    movie_id: first_result.id,
                    poster_url: self.poster_url(first_result.poster_path.as_deref()),
                };

                self.store.create(&record).await?;
                Ok(())
            }
        }
    }

    async fn trending(&self, limit: usize) -> Result<Vec<SearchRecord>, StoreError> {
        let documents = self.store.list_top(limit).await?;

        Ok(documents
            .into_iter()
            .map(crate::clients::SearchDocument::into_record)
            .collect())
    }
}
