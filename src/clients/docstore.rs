use reqwest::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::AnalyticsConfig;
use crate::models::SearchRecord;

/// Errors from the hosted document store. Callers treat these as
/// non-fatal: analytics failures never affect visible search results.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document store error: {status} - {body}")]
    Request { status: StatusCode, body: String },

    #[error("Document store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid document store URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// A search-counter document as stored, with its server-assigned id.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchDocument {
    #[serde(rename = "$id")]
    pub id: String,

    #[serde(rename = "searchTerm")]
    pub search_term: String,

    pub count: i64,

    pub movie_id: i64,

    pub poster_url: String,
}

impl SearchDocument {
    #[must_use]
    pub fn into_record(self) -> SearchRecord {
        SearchRecord {
            search_term: self.search_term,
            count: self.count,
            movie_id: self.movie_id,
            poster_url: self.poster_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    documents: Vec<SearchDocument>,
    #[serde(default)]
    _total: i64,
}

/// Low-level operations against one collection of the document store.
///
/// The analytics layer builds its record-or-create and trending logic
/// on top of these; tests substitute an in-memory implementation.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Exact-match lookup by search term.
    async fn find_by_term(&self, term: &str) -> Result<Option<SearchDocument>, StoreError>;

    async fn create(&self, record: &SearchRecord) -> Result<SearchDocument, StoreError>;

    async fn update_count(&self, document_id: &str, count: i64) -> Result<(), StoreError>;

    /// Top documents by `count` descending. Ties come back in whatever
    /// order the store chooses; that order is unspecified.
    async fn list_top(&self, limit: usize) -> Result<Vec<SearchDocument>, StoreError>;
}

/// Builds the exact-match filter for a search term. The term is free
/// user text, so it is JSON-encoded rather than interpolated raw.
fn term_filter(term: &str) -> String {
    format!("equal(\"searchTerm\", {})", serde_json::json!([term]))
}

#[derive(Clone)]
pub struct DocStoreClient {
    client: Client,
    config: AnalyticsConfig,
}

impl DocStoreClient {
    #[must_use]
    pub const fn new(config: AnalyticsConfig, client: Client) -> Self {
        Self { client, config }
    }

    fn documents_base(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.config.endpoint, self.config.database_id, self.config.collection_id
        )
    }

    fn documents_url(&self) -> Result<Url, StoreError> {
        Ok(Url::parse(&self.documents_base())?)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("X-Appwrite-Project", &self.config.project_id)
            .header("X-Appwrite-Key", &self.config.api_key)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::Request { status, body })
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for DocStoreClient {
    async fn find_by_term(&self, term: &str) -> Result<Option<SearchDocument>, StoreError> {
        let mut url = self.documents_url()?;
        url.query_pairs_mut()
            .append_pair("queries[]", &term_filter(term));

        debug!("Looking up search record for '{}'", term);

        let response = Self::check(self.request(reqwest::Method::GET, url).send().await?).await?;
        let list: DocumentList = response.json().await?;

        Ok(list.documents.into_iter().next())
    }

    async fn create(&self, record: &SearchRecord) -> Result<SearchDocument, StoreError> {
        let url = self.documents_url()?;

        debug!("Creating search record for '{}'", record.search_term);

        let body = json!({
            "documentId": "unique()",
            "data": record,
        });

        let response = Self::check(
            self.request(reqwest::Method::POST, url)
                .json(&body)
                .send()
                .await?,
        )
        .await?;

        Ok(response.json().await?)
    }

    async fn update_count(&self, document_id: &str, count: i64) -> Result<(), StoreError> {
        let url = Url::parse(&format!("{}/{}", self.documents_base(), document_id))?;

        debug!("Updating search record {} to count {}", document_id, count);

        let body = json!({ "data": { "count": count } });

        Self::check(
            self.request(reqwest::Method::PATCH, url)
                .json(&body)
                .send()
                .await?,
        )
        .await?;

        Ok(())
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<SearchDocument>, StoreError> {
        let mut url = self.documents_url()?;
        url.query_pairs_mut()
            .append_pair("queries[]", "orderDesc(\"count\")")
            .append_pair("queries[]", &format!("limit({limit})"));

        debug!("Listing top {} search records", limit);

        let response = Self::check(self.request(reqwest::Method::GET, url).send().await?).await?;
        let list: DocumentList = response.json().await?;

        Ok(list.documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_deserialization() {
        let doc: SearchDocument = serde_json::from_str(
            r#"{
                "$id": "abc123",
                "searchTerm": "batman",
                "count": 3,
                "movie_id": 1,
                "poster_url": "https://image.tmdb.org/t/p/w500/x.jpg",
                "$createdAt": "2025-01-01T00:00:00.000+00:00"
            }"#,
        )
        .unwrap();

        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.search_term, "batman");
        assert_eq!(doc.count, 3);

        let record = doc.into_record();
        assert_eq!(record.movie_id, 1);
    }

    #[test]
    fn test_term_filter_plain_term() {
        assert_eq!(term_filter("batman"), r#"equal("searchTerm", ["batman"])"#);
    }

    #[test]
    fn test_term_filter_escapes_quotes_and_backslashes() {
        assert_eq!(term_filter("fo\"o"), r#"equal("searchTerm", ["fo\"o"])"#);
        assert_eq!(term_filter("a\\b"), r#"equal("searchTerm", ["a\\b"])"#);
        assert_eq!(term_filter("x]y"), r#"equal("searchTerm", ["x]y"])"#);
    }

    #[test]
    fn test_record_serializes_with_wire_field_names() {
        let record = SearchRecord {
            search_term: "batman".to_string(),
            count: 1,
            movie_id: 1,
            poster_url: "https://image.tmdb.org/t/p/w500/x.jpg".to_string(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["searchTerm"], "batman");
        assert_eq!(value["count"], 1);
    }
}
