//! Gemini embedding provider (`batchEmbedContents`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use super::{Embedder, TaskType};
use crate::errors::EmbeddingError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct GeminiEmbedder {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiEmbedder {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        task_type: TaskType,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if self.api_key.is_empty() {
            return Err(EmbeddingError::MissingCredential);
        }

        let url = format!(
            "{}/models/{}:batchEmbedContents?key={}",
            self.base_url, self.model, self.api_key
        );

        let requests: Vec<Value> = texts
            .iter()
            .map(|text| {
                json!({
                    "model": format!("models/{}", self.model),
                    "content": { "parts": [{ "text": text }] },
                    "taskType": task_type.as_str(),
                })
            })
            .collect();

        let res = self
            .client
            .post(&url)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(|e| EmbeddingError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => EmbeddingError::RateLimited(text),
                StatusCode::BAD_REQUEST => EmbeddingError::InvalidArgument(text),
                _ => EmbeddingError::Transport(format!("{status}: {text}")),
            });
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|e| EmbeddingError::MalformedResponse(e.to_string()))?;

        let embeddings = payload["embeddings"].as_array().ok_or_else(|| {
            EmbeddingError::MalformedResponse("missing 'embeddings' array".to_string())
        })?;

        let mut vectors = Vec::with_capacity(embeddings.len());
        for entry in embeddings {
            let values = entry["values"].as_array().ok_or_else(|| {
                EmbeddingError::MalformedResponse("embedding entry missing 'values'".to_string())
            })?;
            vectors.push(
                values
                    .iter()
                    .filter_map(|v| v.as_f64().map(|f| f as f32))
                    .collect(),
            );
        }

        Ok(vectors)
    }
}
