use reqwest::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::models::Movie;

/// Errors from the movie catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The transport reported a non-success status.
    #[error("Catalog API error: {status} - {body}")]
    Fetch { status: StatusCode, body: String },

    /// The payload's own status field signalled failure. The message is
    /// service-provided and shown to the user verbatim.
    #[error("{0}")]
    Api(String),

    #[error("Catalog transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Seam for the search orchestrator; lets tests substitute the catalog.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Empty query means discover mode; non-empty means search mode.
    /// An empty result list is valid, not an error.
    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct CatalogPayload {
    #[serde(default)]
    results: Option<Vec<Movie>>,

    /// Boolean-like in-band status, e.g. `"False"` on failure.
    #[serde(rename = "Response", default)]
    response: Option<String>,

    #[serde(rename = "Error", default)]
    error: Option<String>,
}

fn decode_payload(payload: CatalogPayload) -> Result<Vec<Movie>, CatalogError> {
    if payload
        .response
        .as_deref()
        .is_some_and(|r| r.eq_ignore_ascii_case("false"))
    {
        let message = payload
            .error
            .unwrap_or_else(|| "Failed to fetch movies".to_string());
        return Err(CatalogError::Api(message));
    }

    Ok(payload.results.unwrap_or_default())
}

fn endpoint_url(base_url: &str, query: &str) -> String {
    if query.is_empty() {
        format!("{base_url}/discover/movie?sort_by=popularity.desc")
    } else {
        format!(
            "{}/search/movie?query={}",
            base_url,
            urlencoding::encode(query)
        )
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    config: CatalogConfig,
}

impl TmdbClient {
    #[must_use]
    pub const fn new(config: CatalogConfig, client: Client) -> Self {
        Self { client, config }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Movie>, CatalogError> {
        let url = endpoint_url(&self.config.base_url, query);

        debug!("Fetching movies: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Fetch { status, body });
        }

        let payload: CatalogPayload = response.json().await?;

        decode_payload(payload)
    }
}

#[async_trait::async_trait]
impl CatalogSource for TmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError> {
        self.fetch(query).await
    }
}
