//! Agentic RAG: answer questions from an ingested corpus, with a gated web
//! search fallback.
//!
//! The query pipeline embeds the question, retrieves top-K context from the
//! vector index, asks the decision model whether that context suffices, and
//! either answers from it or widens to a single web search before
//! synthesizing the final answer.

pub mod agent;
pub mod config;
pub mod embedding;
pub mod errors;
pub mod ingest;
pub mod llm;
pub mod logging;
pub mod retrieval;
pub mod search;
pub mod sentinels;
pub mod vector;

pub use agent::{ContextOrigin, QueryOrchestrator, QueryResult};
pub use config::AgentConfig;
pub use errors::{AgentError, EmbeddingError};
