//! Web search adapter: Google Custom Search plus citation-block rendering.

mod citations;
mod client;
mod types;

pub use citations::format_citation_block;
pub use client::{SearchClient, SearchError};
pub use types::SearchResult;
