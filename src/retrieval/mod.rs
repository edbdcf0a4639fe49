//! Query-time context retrieval.
//!
//! Embeds the query, searches the vector index, and renders the hits into
//! context text. Retrieval never fails outward: index-absent, zero-result,
//! and error outcomes each map to their own sentinel from
//! [`crate::sentinels`], and the orchestrator passes whatever comes back
//! straight into the relevance gate.

use std::sync::Arc;

use crate::embedding::{EmbeddingClient, TaskType};
use crate::sentinels;
use crate::vector::{ScoredChunk, VectorStore};

const ENTRY_DELIMITER: &str = "\n\n---\n\n";

pub struct ContextRetriever {
    embeddings: Arc<EmbeddingClient>,
    store: Arc<dyn VectorStore>,
}

impl ContextRetriever {
    pub fn new(embeddings: Arc<EmbeddingClient>, store: Arc<dyn VectorStore>) -> Self {
        Self { embeddings, store }
    }

    /// Retrieve and format vector context for `query`.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> String {
        match self.store.exists().await {
            Ok(false) => {
                tracing::warn!("vector collection not found; nothing ingested yet");
                return sentinels::VECTOR_INDEX_ABSENT.to_string();
            }
            Ok(true) => {}
            Err(err) => {
                tracing::error!("existence check failed: {err}");
                return sentinels::VECTOR_RETRIEVAL_ERROR.to_string();
            }
        }

        let query_vector = match self
            .embeddings
            .embed(&[query.to_string()], TaskType::Query)
            .await
        {
            Ok(mut vectors) if vectors.len() == 1 => vectors.remove(0),
            Ok(vectors) => {
                tracing::error!("expected 1 query vector, got {}", vectors.len());
                return sentinels::VECTOR_RETRIEVAL_ERROR.to_string();
            }
            Err(err) => {
                tracing::error!("query embedding failed: {err}");
                return sentinels::VECTOR_RETRIEVAL_ERROR.to_string();
            }
        };

        let results = match self.store.search(&query_vector, top_k).await {
            Ok(results) => results,
            Err(err) => {
                tracing::error!("vector search failed: {err}");
                return sentinels::VECTOR_RETRIEVAL_ERROR.to_string();
            }
        };

        tracing::debug!("vector search returned {} results", results.len());
        format_results(&results)
    }
}

/// Render ranked hits into context text: 1-based rank, source, score to four
/// decimal places, entries joined by a fixed delimiter.
pub fn format_results(results: &[ScoredChunk]) -> String {
    if results.is_empty() {
        return sentinels::VECTOR_NO_RESULTS.to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "Retrieved Document {} (Source: {}, Score: {:.4}):\n{}",
                i + 1,
                chunk.source,
                chunk.score,
                chunk.content
            )
        })
        .collect::<Vec<_>>()
        .join(ENTRY_DELIMITER)
}
