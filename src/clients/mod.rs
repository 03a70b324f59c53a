pub mod docstore;
pub mod tmdb;

pub use docstore::{DocStoreClient, DocumentStore, SearchDocument, StoreError};
pub use tmdb::{CatalogError, CatalogSource, TmdbClient};
