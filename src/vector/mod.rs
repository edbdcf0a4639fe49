//! VectorStore trait: abstract interface for the vector index service.
//!
//! The pipeline consumes the index only through this narrow surface:
//! idempotent collection management, bulk upsert during ingestion, and
//! top-K similarity search at query time.

pub mod qdrant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AgentError;

pub use qdrant::QdrantStore;

/// Payload stored alongside each vector. Source travels with the chunk so
/// answers can cite where the text came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkPayload {
    pub content: String,
    pub source: String,
}

/// A point ready for upsert: id, embedding, payload.
#[derive(Debug, Clone)]
pub struct IndexPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: ChunkPayload,
}

/// One similarity search hit, ordered by descending score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub content: String,
    pub source: String,
    pub score: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection if it does not exist. Safe to call repeatedly.
    async fn create_collection(&self) -> Result<(), AgentError>;

    /// Delete the collection. Deleting a missing collection is not an error.
    async fn delete_collection(&self) -> Result<(), AgentError>;

    async fn exists(&self) -> Result<bool, AgentError>;

    async fn upsert(&self, points: Vec<IndexPoint>) -> Result<(), AgentError>;

    /// Ranked list (possibly empty) of the `top_k` nearest chunks.
    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>, AgentError>;

    async fn count(&self) -> Result<u64, AgentError>;
}
