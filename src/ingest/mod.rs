//! Batch ingestion: load -> clean/chunk -> embed -> upsert.
//!
//! Ingestion is all-or-nothing: any count mismatch between chunks, ids, and
//! embeddings aborts before a single point is written. Collection creation
//! is an idempotent create-if-absent step, so re-running ingestion into an
//! existing collection upserts over it.

pub mod chunker;
pub mod loader;

use std::path::PathBuf;
use std::sync::Arc;

pub use chunker::{clean_text, Chunk, Chunker, Document};

use crate::config::AgentConfig;
use crate::embedding::{EmbeddingClient, GeminiEmbedder, TaskType};
use crate::errors::AgentError;
use crate::vector::{ChunkPayload, IndexPoint, QdrantStore, VectorStore};

#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
    pub uploaded: usize,
    pub total_points: u64,
}

pub struct IngestPipeline {
    embeddings: Arc<EmbeddingClient>,
    store: Arc<dyn VectorStore>,
    chunker: Chunker,
    data_dir: PathBuf,
    urls: Vec<String>,
}

impl IngestPipeline {
    pub fn new(
        embeddings: Arc<EmbeddingClient>,
        store: Arc<dyn VectorStore>,
        chunker: Chunker,
        data_dir: PathBuf,
        urls: Vec<String>,
    ) -> Self {
        Self {
            embeddings,
            store,
            chunker,
            data_dir,
            urls,
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        let embeddings = Arc::new(EmbeddingClient::new(
            Arc::new(GeminiEmbedder::new(
                config.google_api_key.clone(),
                config.embedding_model.clone(),
            )),
            config.embedding_batch_size,
            config.requests_per_minute,
        ));
        let store: Arc<dyn VectorStore> = Arc::new(QdrantStore::new(
            &config.qdrant_url,
            &config.collection_name,
            config.vector_size,
        ));
        Self::new(
            embeddings,
            store,
            Chunker::new(config.chunk_size, config.chunk_overlap),
            config.data_dir.clone(),
            config.ingest_urls.clone(),
        )
    }

    pub async fn run(&self) -> Result<IngestReport, AgentError> {
        let documents = loader::load_sources(&self.urls, &self.data_dir).await?;
        if documents.is_empty() {
            tracing::warn!("no documents loaded, nothing to ingest");
            return Ok(IngestReport::default());
        }

        let mut chunks: Vec<Chunk> = Vec::new();
        for doc in &documents {
            let cleaned = clean_text(&doc.content);
            if cleaned.is_empty() {
                tracing::warn!("document '{}' empty after cleaning, skipped", doc.source);
                continue;
            }
            chunks.extend(self.chunker.split(&cleaned, &doc.source));
        }

        if chunks.is_empty() {
            tracing::warn!("no chunks produced, nothing to ingest");
            return Ok(IngestReport {
                documents: documents.len(),
                ..Default::default()
            });
        }
        tracing::info!("generated {} chunks from {} documents", chunks.len(), documents.len());

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embeddings.embed(&texts, TaskType::Document).await?;

        // All-or-nothing: verify counts line up before any write.
        if embeddings.len() != chunks.len() {
            return Err(AgentError::Consistency(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let points: Vec<IndexPoint> = chunks
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(id, (chunk, vector))| IndexPoint {
                id: id as u64,
                vector,
                payload: ChunkPayload {
                    content: chunk.text.clone(),
                    source: chunk.source.clone(),
                },
            })
            .collect();
        if points.len() != chunks.len() {
            return Err(AgentError::Consistency(format!(
                "{} chunks but {} points",
                chunks.len(),
                points.len()
            )));
        }

        self.store.create_collection().await?;
        let uploaded = points.len();
        self.store.upsert(points).await?;
        let total_points = self.store.count().await?;

        tracing::info!("ingestion complete: {uploaded} points uploaded, {total_points} total");
        Ok(IngestReport {
            documents: documents.len(),
            chunks: chunks.len(),
            uploaded,
            total_points,
        })
    }
}
