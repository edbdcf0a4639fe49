use async_trait::async_trait;

use super::types::CompletionRequest;
use crate::errors::AgentError;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// return the provider name (e.g. "gemini")
    fn name(&self) -> &str;

    /// completion (non-streaming); the trimmed response text on success
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AgentError>;
}
