use serde::{Deserialize, Serialize};

/// A movie as returned by the catalog service.
///
/// The catalog payload carries many more fields; only the ones the
/// search flow consumes are kept, the rest are ignored on deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub poster_path: Option<String>,
}
