//! Web search fallback.
//!
//! Used only when the relevance gate rejects vector context and the
//! fallback flag is enabled. Like retrieval, this never fails outward:
//! provider error, zero results, and snippet-less results each render as
//! their own sentinel.

pub mod duckduckgo;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::AgentError;
use crate::sentinels;

pub use duckduckgo::DuckDuckGoSearch;

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Ranked results, up to `max_results`. May legitimately return fewer
    /// or none.
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<SearchHit>, AgentError>;
}

pub struct WebFallbackRetriever {
    provider: Arc<dyn WebSearchProvider>,
    max_results: usize,
}

impl WebFallbackRetriever {
    pub fn new(provider: Arc<dyn WebSearchProvider>, max_results: usize) -> Self {
        Self {
            provider,
            max_results,
        }
    }

    /// Search the web and render snippets as context text. The search call
    /// is attempted exactly once.
    pub async fn retrieve(&self, query: &str) -> String {
        tracing::info!(
            "web search via {} for '{}' (max {} results)",
            self.provider.name(),
            query,
            self.max_results
        );

        let results = match self.provider.search(query, self.max_results).await {
            Ok(results) => results,
            Err(err) => {
                tracing::error!("web search failed: {err}");
                return sentinels::WEB_SEARCH_ERROR.to_string();
            }
        };

        format_snippets(&results)
    }
}

/// Join non-empty snippets into one context block.
pub fn format_snippets(results: &[SearchHit]) -> String {
    if results.is_empty() {
        return sentinels::WEB_NO_RESULTS.to_string();
    }

    let snippets: Vec<&str> = results
        .iter()
        .map(|hit| hit.snippet.as_str())
        .filter(|s| !s.is_empty())
        .collect();

    if snippets.is_empty() {
        return sentinels::WEB_NO_SNIPPETS.to_string();
    }

    snippets.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, snippet: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            url: format!("https://example.com/{title}"),
            snippet: snippet.to_string(),
        }
    }

    #[test]
    fn zero_results_render_the_no_results_sentinel() {
        assert_eq!(format_snippets(&[]), sentinels::WEB_NO_RESULTS);
    }

    #[test]
    fn results_without_snippet_text_render_their_own_sentinel() {
        let formatted = format_snippets(&[hit("a", ""), hit("b", "")]);
        assert_eq!(formatted, sentinels::WEB_NO_SNIPPETS);
        assert_ne!(formatted, sentinels::WEB_NO_RESULTS);
    }

    #[test]
    fn snippets_are_joined_with_blank_lines() {
        let formatted = format_snippets(&[hit("a", "first"), hit("b", ""), hit("c", "second")]);
        assert_eq!(formatted, "first\n\nsecond");
    }
}
