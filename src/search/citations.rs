use std::fmt::Write;

use super::types::SearchResult;

/// Renders results as a 1-indexed citation block:
///
/// ```text
/// 1. title
/// snippet
/// Source: link
/// ```
///
/// The index of each entry equals its position in `results`, so a `[1]` in
/// provider output always points at `results[0]`.
pub fn format_citation_block(results: &[SearchResult]) -> String {
    let mut block = String::new();
    for (i, result) in results.iter().enumerate() {
        let _ = write!(
            block,
            "{}. {}\n{}\nSource: {}\n\n",
            i + 1,
            result.title,
            result.snippet,
            result.link
        );
    }
    block
}
