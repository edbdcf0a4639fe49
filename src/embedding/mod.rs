//! Batched, rate-limited embedding generation.
//!
//! [`EmbeddingClient`] partitions input texts into fixed-size batches,
//! forwards each batch to the configured [`Embedder`], and concatenates the
//! vectors in input order. Failure semantics are whole-call: any batch error
//! aborts the call and discards vectors already obtained.

pub mod gemini;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::EmbeddingError;

pub use gemini::GeminiEmbedder;

const SECONDS_PER_MINUTE: f64 = 60.0;

/// What the embedding will be used for. The provider produces different
/// vectors for storage and for search queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    Document,
    Query,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Document => "RETRIEVAL_DOCUMENT",
            TaskType::Query => "RETRIEVAL_QUERY",
        }
    }
}

/// One batch call to an embedding provider.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    /// Embed up to one batch worth of texts. Implementations must return
    /// exactly one vector per input text or an error.
    async fn embed_batch(
        &self,
        texts: &[String],
        task_type: TaskType,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

pub struct EmbeddingClient {
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
    requests_per_minute: u32,
}

impl EmbeddingClient {
    pub fn new(embedder: Arc<dyn Embedder>, batch_size: usize, requests_per_minute: u32) -> Self {
        Self {
            embedder,
            batch_size,
            requests_per_minute,
        }
    }

    /// Delay imposed after each non-final batch to stay under the configured
    /// requests-per-minute ceiling.
    pub fn delay_between_batches(&self) -> Duration {
        Duration::from_secs_f64(
            SECONDS_PER_MINUTE * self.batch_size as f64 / self.requests_per_minute as f64,
        )
    }

    /// Embed `texts`, preserving input order across batches.
    ///
    /// An empty input is not an error and returns immediately. Any batch
    /// failure aborts the whole call; vectors from earlier batches are
    /// discarded rather than returned partially.
    pub async fn embed(
        &self,
        texts: &[String],
        task_type: TaskType,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let total_batches = texts.len().div_ceil(self.batch_size);
        let mut all_vectors = Vec::with_capacity(texts.len());

        for (batch_index, batch) in texts.chunks(self.batch_size).enumerate() {
            tracing::debug!(
                "embedding batch {}/{} ({} texts, task {})",
                batch_index + 1,
                total_batches,
                batch.len(),
                task_type.as_str()
            );

            let vectors = self.embedder.embed_batch(batch, task_type).await?;
            if vectors.len() != batch.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: batch.len(),
                    got: vectors.len(),
                });
            }
            all_vectors.extend(vectors);

            // Rate ceiling: no delay after the final batch.
            if batch_index + 1 < total_batches {
                tokio::time::sleep(self.delay_between_batches()).await;
            }
        }

        Ok(all_vectors)
    }
}
