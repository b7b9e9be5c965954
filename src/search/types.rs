use serde::{Deserialize, Serialize};

/// One web search hit, in the provider's own relevance order. Immutable once
/// fetched; also serialized verbatim into the API response as a source.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub items: Option<Vec<SearchItem>>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: Option<u16>,
    pub message: Option<String>,
}
