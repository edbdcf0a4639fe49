//! Canonical outcome strings shared across the pipeline.
//!
//! Retrieval, web search, and synthesis each report their empty/error
//! outcomes as fixed sentinel text that flows into LLM prompts downstream.
//! Keeping them in one place makes the coupling explicit: the gate and the
//! synthesizer see these strings as context, and tests distinguish outcomes
//! by comparing against them. Every constant here must stay textually
//! distinct from the others.

/// The vector collection has never been created (nothing ingested yet).
pub const VECTOR_INDEX_ABSENT: &str =
    "The vector index does not exist yet. No documents have been ingested.";

/// The search ran but matched nothing.
pub const VECTOR_NO_RESULTS: &str = "No relevant context found in the vector store.";

/// Embedding the query or searching the index failed.
pub const VECTOR_RETRIEVAL_ERROR: &str =
    "An error occurred while retrieving context from the vector store.";

/// The web search provider call itself failed.
pub const WEB_SEARCH_ERROR: &str = "An error occurred during the web search.";

/// The web search succeeded but returned zero results.
pub const WEB_NO_RESULTS: &str = "No relevant information found from web search.";

/// Results came back but none carried extractable snippet text.
pub const WEB_NO_SNIPPETS: &str = "Web search results did not contain usable content snippets.";

/// The refusal sentence the answer prompt instructs the model to produce
/// when the provided context cannot answer the question. Also returned
/// directly by the orchestrator when fallback is disabled.
pub const REFUSAL_ANSWER: &str = "Based on the provided context, I cannot answer this question.";

/// Local failure sentinel for a synthesis call that produced no response at
/// all. Distinct from [`REFUSAL_ANSWER`]: that one is generated by the model,
/// this one means the call itself failed.
pub const ANSWER_FAILURE: &str = "Sorry, I encountered an error while generating the answer.";
