use thiserror::Error;

/// Top-level error type for the agent.
///
/// Routine operational failures (a provider call that errors at query time)
/// are converted into sentinels or safe defaults at the component that owns
/// them; these variants surface only where the caller genuinely has to stop,
/// such as startup validation or ingestion.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{provider} request failed: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },
    #[error("ingestion consistency check failed: {0}")]
    Consistency(String),
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentError {
    pub fn provider<E: std::fmt::Display>(provider: &'static str, err: E) -> Self {
        AgentError::Provider {
            provider,
            message: err.to_string(),
        }
    }
}

/// Tagged outcome for embedding calls.
///
/// Every failure mode of a batch embedding call maps to exactly one variant;
/// a failed batch aborts the whole call, so partial vector lists are never
/// observable alongside one of these.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("GOOGLE_API_KEY is not configured")]
    MissingCredential,
    #[error("embedding count mismatch: expected {expected}, got {got}")]
    CountMismatch { expected: usize, got: usize },
    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),
    #[error("embedding rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("invalid embedding request: {0}")]
    InvalidArgument(String),
    #[error("embedding request failed: {0}")]
    Transport(String),
}
