//! Qdrant-backed vector store over the HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{ChunkPayload, IndexPoint, ScoredChunk, VectorStore};
use crate::errors::AgentError;

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct QdrantStore {
    base_url: String,
    collection: String,
    vector_size: usize,
    client: Client,
}

impl QdrantStore {
    pub fn new(base_url: &str, collection: &str, vector_size: usize) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            vector_size,
            client,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn collection_url(&self, suffix: &str) -> String {
        format!("{}/collections/{}{}", self.base_url, self.collection, suffix)
    }

    async fn parse_result(&self, res: reqwest::Response, what: &str) -> Result<Value, AgentError> {
        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AgentError::Provider {
                provider: "qdrant",
                message: format!("{what} returned {status}: {text}"),
            });
        }
        res.json::<Value>()
            .await
            .map_err(|e| AgentError::provider("qdrant", e))
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn create_collection(&self) -> Result<(), AgentError> {
        if self.exists().await? {
            return Ok(());
        }

        tracing::info!(
            "creating collection '{}' (size {}, cosine)",
            self.collection,
            self.vector_size
        );

        let body = json!({
            "vectors": { "size": self.vector_size, "distance": "Cosine" }
        });
        let res = self
            .client
            .put(self.collection_url(""))
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::provider("qdrant", e))?;
        self.parse_result(res, "create collection").await?;
        Ok(())
    }

    async fn delete_collection(&self) -> Result<(), AgentError> {
        if !self.exists().await? {
            tracing::debug!("collection '{}' already absent", self.collection);
            return Ok(());
        }
        let res = self
            .client
            .delete(self.collection_url(""))
            .send()
            .await
            .map_err(|e| AgentError::provider("qdrant", e))?;
        self.parse_result(res, "delete collection").await?;
        Ok(())
    }

    async fn exists(&self) -> Result<bool, AgentError> {
        let res = self
            .client
            .get(self.collection_url("/exists"))
            .send()
            .await
            .map_err(|e| AgentError::provider("qdrant", e))?;
        let payload = self.parse_result(res, "existence check").await?;
        Ok(payload["result"]["exists"].as_bool().unwrap_or(false))
    }

    async fn upsert(&self, points: Vec<IndexPoint>) -> Result<(), AgentError> {
        if points.is_empty() {
            return Ok(());
        }

        let body = json!({
            "points": points
                .iter()
                .map(|p| json!({
                    "id": p.id,
                    "vector": p.vector,
                    "payload": p.payload,
                }))
                .collect::<Vec<_>>()
        });

        let res = self
            .client
            .put(self.collection_url("/points?wait=true"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::provider("qdrant", e))?;
        let payload = self.parse_result(res, "upsert").await?;

        let status = payload["result"]["status"].as_str().unwrap_or("unknown");
        if status != "completed" && status != "acknowledged" {
            return Err(AgentError::Provider {
                provider: "qdrant",
                message: format!("upsert finished with status '{status}'"),
            });
        }
        Ok(())
    }

    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>, AgentError> {
        let body = json!({
            "vector": vector,
            "limit": top_k,
            "with_payload": true,
        });
        let res = self
            .client
            .post(self.collection_url("/points/search"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::provider("qdrant", e))?;
        let payload = self.parse_result(res, "search").await?;

        let hits = payload["result"].as_array().cloned().unwrap_or_default();
        let mut chunks = Vec::with_capacity(hits.len());
        for hit in hits {
            let score = hit["score"].as_f64().unwrap_or(0.0) as f32;
            let chunk: ChunkPayload = serde_json::from_value(hit["payload"].clone())
                .unwrap_or_else(|_| ChunkPayload {
                    content: "Payload missing or invalid".to_string(),
                    source: "Unknown Source".to_string(),
                });
            chunks.push(ScoredChunk {
                content: chunk.content,
                source: chunk.source,
                score,
            });
        }
        Ok(chunks)
    }

    async fn count(&self) -> Result<u64, AgentError> {
        let res = self
            .client
            .post(self.collection_url("/points/count"))
            .json(&json!({ "exact": true }))
            .send()
            .await
            .map_err(|e| AgentError::provider("qdrant", e))?;
        let payload = self.parse_result(res, "count").await?;
        Ok(payload["result"]["count"].as_u64().unwrap_or(0))
    }
}
