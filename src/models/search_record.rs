use serde::{Deserialize, Serialize};

/// Persisted search-popularity counter, one per distinct search term.
///
/// Lives in the hosted document store; this side only issues
/// increment-or-create requests and never deletes records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    #[serde(rename = "searchTerm")]
    pub search_term: String,

    /// Number of successful searches for this term, always >= 1.
    pub count: i64,

    /// Catalog id of the first result seen when the record was created.
    pub movie_id: i64,

    /// Display poster for the trending list, derived from that first result.
    pub poster_url: String,
}
