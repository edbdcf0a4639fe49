//! Query orchestration.
//!
//! One request/response cycle: retrieve vector context, gate it, and answer
//! from it, or widen to a single web search attempt when the gate rejects
//! and fallback is enabled. The pipeline never loops back to re-query the
//! index or re-run the gate.

pub mod gate;
pub mod synthesizer;

use std::sync::Arc;

pub use gate::{Decision, RelevanceGate};
pub use synthesizer::AnswerSynthesizer;

use crate::config::AgentConfig;
use crate::embedding::{EmbeddingClient, GeminiEmbedder};
use crate::llm::GeminiProvider;
use crate::retrieval::ContextRetriever;
use crate::search::{DuckDuckGoSearch, WebFallbackRetriever};
use crate::sentinels;
use crate::vector::{QdrantStore, VectorStore};

/// Which context source produced the final answer. Exposed for
/// observability and tests; callers of [`QueryOrchestrator::process_query`]
/// receive only the answer string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextOrigin {
    VectorIndex,
    Web,
    None,
}

#[derive(Debug, Clone)]
pub struct QueryResult {
    pub answer: String,
    pub origin: ContextOrigin,
}

pub struct QueryOrchestrator {
    retriever: ContextRetriever,
    gate: RelevanceGate,
    web: WebFallbackRetriever,
    synthesizer: AnswerSynthesizer,
    fallback_enabled: bool,
    top_k: usize,
}

impl QueryOrchestrator {
    pub fn new(
        retriever: ContextRetriever,
        gate: RelevanceGate,
        web: WebFallbackRetriever,
        synthesizer: AnswerSynthesizer,
        fallback_enabled: bool,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            gate,
            web,
            synthesizer,
            fallback_enabled,
            top_k,
        }
    }

    /// Wire up the production providers from configuration.
    pub fn from_config(config: &AgentConfig) -> Self {
        let llm: Arc<GeminiProvider> = Arc::new(GeminiProvider::new(config.google_api_key.clone()));
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
            ContextRetriever::new(embeddings, store),
            RelevanceGate::new(
                llm.clone(),
                config.decision_model.clone(),
                config.decision_system_prompt.clone(),
                config.decision_user_prompt.clone(),
            ),
            WebFallbackRetriever::new(
                Arc::new(DuckDuckGoSearch::new()),
                config.web_search_max_results,
            ),
            AnswerSynthesizer::new(
                llm,
                config.answer_model.clone(),
                config.answer_system_prompt.clone(),
                config.answer_user_prompt.clone(),
                config.max_answer_tokens,
            ),
            config.allow_web_search_fallback,
            config.retrieval_top_k,
        )
    }

    /// Process one question into a final answer string.
    pub async fn process_query(&self, question: &str) -> String {
        self.execute(question).await.answer
    }

    /// Like [`Self::process_query`] but keeps which context source produced
    /// the answer.
    pub async fn execute(&self, question: &str) -> QueryResult {
        tracing::info!("processing query: '{question}'");

        // Retrieval output goes into the gate verbatim, sentinels included;
        // the gate is never short-circuited on retrieval outcome.
        let vector_context = self.retriever.retrieve(question, self.top_k).await;

        match self.gate.decide(&vector_context, question).await {
            Decision::Sufficient => {
                tracing::info!("vector context judged sufficient");
                QueryResult {
                    answer: self.synthesizer.synthesize(&vector_context, question).await,
                    origin: ContextOrigin::VectorIndex,
                }
            }
            Decision::Insufficient if !self.fallback_enabled => {
                tracing::info!("vector context insufficient and web fallback disabled");
                QueryResult {
                    answer: sentinels::REFUSAL_ANSWER.to_string(),
                    origin: ContextOrigin::None,
                }
            }
            Decision::Insufficient => {
                tracing::info!("vector context insufficient, falling back to web search");
                // One attempt only. Even an error/empty sentinel proceeds to
                // synthesis; the answer prompt's refusal handling covers it.
                let web_context = self.web.retrieve(question).await;
                QueryResult {
                    answer: self.synthesizer.synthesize(&web_context, question).await,
                    origin: ContextOrigin::Web,
                }
            }
        }
    }
}
