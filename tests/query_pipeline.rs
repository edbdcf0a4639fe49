//! End-to-end tests of the query pipeline against scripted collaborators.
//!
//! No network: every provider seam (LLM, embedder, vector store, web
//! search) is replaced by a mock, so these tests pin down the orchestration
//! contract: what gets called, in which order, and with which context.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use agentic_rag::agent::{
    AnswerSynthesizer, ContextOrigin, QueryOrchestrator, RelevanceGate,
};
use agentic_rag::config::{
    ANSWER_SYSTEM_PROMPT, ANSWER_USER_PROMPT, DECISION_SYSTEM_PROMPT, DECISION_USER_PROMPT,
};
use agentic_rag::embedding::{Embedder, EmbeddingClient, TaskType};
use agentic_rag::errors::{AgentError, EmbeddingError};
use agentic_rag::llm::{CompletionRequest, LlmProvider};
use agentic_rag::retrieval::ContextRetriever;
use agentic_rag::search::{SearchHit, WebFallbackRetriever, WebSearchProvider};
use agentic_rag::sentinels;
use agentic_rag::vector::{IndexPoint, ScoredChunk, VectorStore};

/// LLM double that returns a fixed reply (or fails) and records every
/// request it sees.
struct ScriptedLlm {
    reply: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn seen_system_prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.system_prompt.clone())
            .collect()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, AgentError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(AgentError::Provider {
                provider: "scripted",
                message: "provider down".to_string(),
            }),
        }
    }
}

struct UnitEmbedder;

#[async_trait]
impl Embedder for UnitEmbedder {
    fn name(&self) -> &str {
        "unit"
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        _task_type: TaskType,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|_| vec![0.1, 0.2, 0.3]).collect())
    }
}

struct StaticStore {
    exists: bool,
    hits: Vec<ScoredChunk>,
}

#[async_trait]
impl VectorStore for StaticStore {
    async fn create_collection(&self) -> Result<(), AgentError> {
        Ok(())
    }

    async fn delete_collection(&self) -> Result<(), AgentError> {
        Ok(())
    }

    async fn exists(&self) -> Result<bool, AgentError> {
        Ok(self.exists)
    }

    async fn upsert(&self, _points: Vec<IndexPoint>) -> Result<(), AgentError> {
        Ok(())
    }

    async fn search(&self, _vector: &[f32], _top_k: usize) -> Result<Vec<ScoredChunk>, AgentError> {
        Ok(self.hits.clone())
    }

    async fn count(&self) -> Result<u64, AgentError> {
        Ok(self.hits.len() as u64)
    }
}

struct ScriptedWeb {
    hits: Result<Vec<SearchHit>, ()>,
    called: AtomicBool,
}

impl ScriptedWeb {
    fn returning(snippets: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            hits: Ok(snippets
                .iter()
                .map(|s| SearchHit {
                    title: "result".to_string(),
                    url: "https://example.com".to_string(),
                    snippet: s.to_string(),
                })
                .collect()),
            called: AtomicBool::new(false),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            hits: Err(()),
            called: AtomicBool::new(false),
        })
    }

    fn was_called(&self) -> bool {
        self.called.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearchProvider for ScriptedWeb {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn search(
        &self,
        _query: &str,
        _max_results: usize,
    ) -> Result<Vec<SearchHit>, AgentError> {
        self.called.store(true, Ordering::SeqCst);
        match &self.hits {
            Ok(hits) => Ok(hits.clone()),
            Err(()) => Err(AgentError::Provider {
                provider: "scripted",
                message: "search down".to_string(),
            }),
        }
    }
}

struct Harness {
    orchestrator: QueryOrchestrator,
    decision_llm: Arc<ScriptedLlm>,
    answer_llm: Arc<ScriptedLlm>,
    web: Arc<ScriptedWeb>,
}

fn harness(
    store: StaticStore,
    decision_llm: Arc<ScriptedLlm>,
    answer_llm: Arc<ScriptedLlm>,
    web: Arc<ScriptedWeb>,
    fallback_enabled: bool,
) -> Harness {
    let embeddings = Arc::new(EmbeddingClient::new(Arc::new(UnitEmbedder), 100, 1400));
    let retriever = ContextRetriever::new(embeddings, Arc::new(store));
    let gate = RelevanceGate::new(
        decision_llm.clone() as Arc<dyn LlmProvider>,
        "decision-model".to_string(),
        DECISION_SYSTEM_PROMPT.to_string(),
        DECISION_USER_PROMPT.to_string(),
    );
    let synthesizer = AnswerSynthesizer::new(
        answer_llm.clone() as Arc<dyn LlmProvider>,
        "answer-model".to_string(),
        ANSWER_SYSTEM_PROMPT.to_string(),
        ANSWER_USER_PROMPT.to_string(),
        800,
    );
    let fallback = WebFallbackRetriever::new(web.clone() as Arc<dyn WebSearchProvider>, 5);

    Harness {
        orchestrator: QueryOrchestrator::new(retriever, gate, fallback, synthesizer, fallback_enabled, 3),
        decision_llm,
        answer_llm,
        web,
    }
}

fn llama_store() -> StaticStore {
    StaticStore {
        exists: true,
        hits: vec![ScoredChunk {
            content: "Llama 3 is a Large Language Model from Meta AI.".to_string(),
            source: "llama.txt".to_string(),
            score: 0.92,
        }],
    }
}

#[tokio::test]
async fn sufficient_context_answers_from_the_vector_index() {
    // Scenario A: the gate accepts and the answer comes from vector context.
    let h = harness(
        llama_store(),
        ScriptedLlm::replying("1"),
        ScriptedLlm::replying("Llama 3 was made by Meta AI."),
        ScriptedWeb::returning(&["unused"]),
        true,
    );

    let result = h.orchestrator.execute("Who made Llama 3?").await;

    assert_eq!(result.origin, ContextOrigin::VectorIndex);
    assert_eq!(result.answer, "Llama 3 was made by Meta AI.");
    assert!(result.answer.contains("Meta AI"));
    assert!(!h.web.was_called(), "web search must not run when sufficient");

    // The synthesizer saw the retrieved chunk, formatted with rank and score.
    let prompts = h.answer_llm.seen_system_prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Retrieved Document 1 (Source: llama.txt, Score: 0.9200):"));
    assert!(prompts[0].contains("Llama 3 is a Large Language Model from Meta AI."));
}

#[tokio::test]
async fn insufficient_with_fallback_disabled_refuses_without_web_search() {
    // Scenario B: unrelated context, fallback off -> canonical refusal.
    let h = harness(
        llama_store(),
        ScriptedLlm::replying("0"),
        ScriptedLlm::replying("should never be asked"),
        ScriptedWeb::returning(&["unused"]),
        false,
    );

    let result = h.orchestrator.execute("What is the capital of Canada?").await;

    assert_eq!(result.origin, ContextOrigin::None);
    assert_eq!(result.answer, sentinels::REFUSAL_ANSWER);
    assert!(!h.web.was_called());
    assert!(h.answer_llm.seen_system_prompts().is_empty());
}

#[tokio::test]
async fn insufficient_with_fallback_enabled_answers_from_web_snippets() {
    // Scenario C: the answer derives from web snippets, not the rejected
    // vector context.
    let h = harness(
        llama_store(),
        ScriptedLlm::replying("0"),
        ScriptedLlm::replying("Ottawa is the capital of Canada."),
        ScriptedWeb::returning(&["Ottawa is the capital city of Canada.", "It sits on the Ottawa River."]),
        true,
    );

    let result = h.orchestrator.execute("What is the capital of Canada?").await;

    assert_eq!(result.origin, ContextOrigin::Web);
    assert_eq!(result.answer, "Ottawa is the capital of Canada.");
    assert!(h.web.was_called());

    let prompts = h.answer_llm.seen_system_prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Ottawa is the capital city of Canada."));
    assert!(prompts[0].contains("It sits on the Ottawa River."));
    assert!(!prompts[0].contains("Llama 3"), "rejected vector context must not leak");
}

#[tokio::test]
async fn retrieval_sentinel_still_flows_through_the_gate() {
    // The gate is never short-circuited: an index-absent sentinel is itself
    // judged by the decision model.
    let h = harness(
        StaticStore {
            exists: false,
            hits: vec![],
        },
        ScriptedLlm::replying("0"),
        ScriptedLlm::replying("unused"),
        ScriptedWeb::returning(&[]),
        false,
    );

    let result = h.orchestrator.execute("Anything?").await;
    assert_eq!(result.answer, sentinels::REFUSAL_ANSWER);

    let prompts = h.decision_llm.seen_system_prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(sentinels::VECTOR_INDEX_ABSENT));
}

#[tokio::test]
async fn gate_failure_defaults_to_insufficient() {
    let h = harness(
        llama_store(),
        ScriptedLlm::failing(),
        ScriptedLlm::replying("unused"),
        ScriptedWeb::returning(&["snippet"]),
        false,
    );

    let result = h.orchestrator.execute("Who made Llama 3?").await;
    assert_eq!(result.origin, ContextOrigin::None);
    assert_eq!(result.answer, sentinels::REFUSAL_ANSWER);
}

#[tokio::test]
async fn garbled_decision_output_defaults_to_insufficient() {
    let h = harness(
        llama_store(),
        ScriptedLlm::replying("no clear answer"),
        ScriptedLlm::replying("unused"),
        ScriptedWeb::returning(&["snippet"]),
        false,
    );

    let result = h.orchestrator.execute("Who made Llama 3?").await;
    assert_eq!(result.answer, sentinels::REFUSAL_ANSWER);
}

#[tokio::test]
async fn web_search_error_sentinel_still_reaches_synthesis() {
    // One fallback attempt, no retry, and even the error sentinel becomes
    // synthesis context.
    let h = harness(
        llama_store(),
        ScriptedLlm::replying("0"),
        ScriptedLlm::replying("I cannot find that information."),
        ScriptedWeb::failing(),
        true,
    );

    let result = h.orchestrator.execute("What is the capital of Canada?").await;

    assert_eq!(result.origin, ContextOrigin::Web);
    assert_eq!(result.answer, "I cannot find that information.");

    let prompts = h.answer_llm.seen_system_prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(sentinels::WEB_SEARCH_ERROR));
}

#[tokio::test]
async fn synthesizer_failure_yields_the_local_failure_sentinel() {
    let h = harness(
        llama_store(),
        ScriptedLlm::replying("1"),
        ScriptedLlm::failing(),
        ScriptedWeb::returning(&[]),
        true,
    );

    let result = h.orchestrator.execute("Who made Llama 3?").await;

    assert_eq!(result.answer, sentinels::ANSWER_FAILURE);
    assert_ne!(result.answer, sentinels::REFUSAL_ANSWER);
    assert_eq!(result.origin, ContextOrigin::VectorIndex);
}

#[tokio::test]
async fn process_query_returns_the_plain_answer_string() {
    let h = harness(
        llama_store(),
        ScriptedLlm::replying("1"),
        ScriptedLlm::replying("Meta AI made it."),
        ScriptedWeb::returning(&[]),
        true,
    );

    let answer = h.orchestrator.process_query("Who made Llama 3?").await;
    assert_eq!(answer, "Meta AI made it.");
}
