use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{SearchItem, SearchResponse, SearchResult};
use crate::config::env_nonempty;

const API_BASE: &str = "https://www.googleapis.com/customsearch/v1";
const MAX_RESULTS: usize = 5;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Google Custom Search adapter. Constructed only when both credentials are
/// present; an unconfigured adapter is simply absent, not an error.
#[derive(Clone)]
pub struct SearchClient {
    http: Client,
    api_key: ApiKey,
    cx: String,
    base_url: String,
}

impl SearchClient {
    pub fn from_env(http: Client) -> Option<Self> {
        let api_key = env_nonempty("GOOGLE_SEARCH_KEY")?;
        let cx = env_nonempty("GOOGLE_SEARCH_CX")?;
        Some(Self {
            http,
            api_key: ApiKey(api_key),
            cx,
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey("test-key".to_string()),
            cx: "test-cx".to_string(),
            base_url: base_url.to_string(),
        }
    }

    /// Fetches up to 5 results in the provider's relevance order. Callers treat
    /// any error as "answer without citations"; nothing here aborts a request.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.0.as_str()),
                ("cx", self.cx.as_str()),
                ("q", query),
                ("num", "5"),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let (code, message) = if let Ok(body) = serde_json::from_str::<SearchResponse>(&text)
                && let Some(err) = body.error
            {
                (
                    err.code.unwrap_or(status.as_u16()),
                    err.message.unwrap_or_else(|| format!("HTTP {status}")),
                )
            } else {
                let snippet = if text.len() > 200 { &text[..200] } else { &text };
                (status.as_u16(), format!("HTTP {status}: {snippet}"))
            };
            warn!(status = %status, "search API error");
            return Err(SearchError::Api { code, message });
        }

        let body: SearchResponse = response.json().await?;
        let results: Vec<SearchResult> = body
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(into_result)
            .take(MAX_RESULTS)
            .collect();

        debug!(count = results.len(), "search complete");
        Ok(results)
    }
}

fn into_result(item: SearchItem) -> Option<SearchResult> {
    let link = item.link.filter(|l| !l.is_empty())?;
    Some(SearchResult {
        title: item.title.unwrap_or_default(),
        snippet: item.snippet.unwrap_or_default(),
        link,
    })
}
