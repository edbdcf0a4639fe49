//! Agent configuration.
//!
//! A single validated [`AgentConfig`] value is built once at startup and
//! passed into each component's constructor. Values come from an optional
//! TOML file with environment overrides for the credential and the index
//! URL; defaults mirror the shipped deployment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::AgentError;

/// System prompt for the sufficiency decision. `{context}` is substituted
/// with the retrieved text before the call.
pub const DECISION_SYSTEM_PROMPT: &str = "\
Your job is decide if a given question can be answered with a given context.
If the context contains information that can directly answer the question, return 1.
If the context does not contain information to answer the question, return 0.

Respond ONLY with 0 or 1. Do not provide any explanation, preamble, or justification. Just the single digit.

Context:
{context}
";

/// User prompt for the sufficiency decision. `{question}` is substituted.
pub const DECISION_USER_PROMPT: &str = "\nQuestion: {question}\n\nAnswer:";

/// System prompt for answer synthesis. `{context}` is substituted. The
/// refusal sentence embedded here must match
/// [`crate::sentinels::REFUSAL_ANSWER`] exactly.
pub const ANSWER_SYSTEM_PROMPT: &str = "\
You are an expert Q&A system. Your task is to answer the question based *only* on the provided context below.
Do not use any external knowledge or information you might have. Focus solely on the text provided in the 'Context'.
If the question cannot be answered using the provided context, respond exactly with: \"Based on the provided context, I cannot answer this question.\"
Do not try to infer or make up information not present in the context.
Your answer should be informative and concise, directly addressing the question using only the context information. Format your response in Markdown.

Context:
{context}
";

/// User prompt for answer synthesis. `{question}` is substituted.
pub const ANSWER_USER_PROMPT: &str = "\nQuestion: {question}\n\nAnswer:";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Credential for both embeddings and LLM calls. Never read from the
    /// config file; only the `GOOGLE_API_KEY` environment variable.
    #[serde(skip)]
    pub google_api_key: String,

    /// Base URL of the Qdrant instance.
    pub qdrant_url: String,
    /// Collection holding the ingested chunks.
    pub collection_name: String,
    /// Embedding dimensionality. Must match the collection's configured
    /// dimension; checked only when the collection is created.
    pub vector_size: usize,

    pub embedding_model: String,
    /// Texts per embedding request.
    pub embedding_batch_size: usize,
    /// Rate ceiling the inter-batch delay is derived from.
    pub requests_per_minute: u32,

    pub retrieval_top_k: usize,

    pub decision_model: String,
    pub answer_model: String,
    pub max_answer_tokens: u32,

    /// When false, an insufficient decision terminates with the refusal
    /// sentence and web search is never touched.
    pub allow_web_search_fallback: bool,
    pub web_search_max_results: usize,

    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Folder scanned for `.txt`/`.md` documents during ingestion.
    pub data_dir: PathBuf,
    /// URLs fetched and ingested alongside the data folder.
    pub ingest_urls: Vec<String>,

    pub decision_system_prompt: String,
    pub decision_user_prompt: String,
    pub answer_system_prompt: String,
    pub answer_user_prompt: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            google_api_key: String::new(),
            qdrant_url: "http://localhost:6333".to_string(),
            collection_name: "agent_rag_index".to_string(),
            vector_size: 768,
            embedding_model: "text-embedding-004".to_string(),
            embedding_batch_size: 100,
            requests_per_minute: 1400,
            retrieval_top_k: 3,
            decision_model: "gemini-1.5-flash-latest".to_string(),
            answer_model: "gemini-1.5-flash-latest".to_string(),
            max_answer_tokens: 800,
            allow_web_search_fallback: true,
            web_search_max_results: 5,
            chunk_size: 500,
            chunk_overlap: 50,
            data_dir: PathBuf::from("./rag_data"),
            ingest_urls: Vec::new(),
            decision_system_prompt: DECISION_SYSTEM_PROMPT.to_string(),
            decision_user_prompt: DECISION_USER_PROMPT.to_string(),
            answer_system_prompt: ANSWER_SYSTEM_PROMPT.to_string(),
            answer_user_prompt: ANSWER_USER_PROMPT.to_string(),
        }
    }
}

impl AgentConfig {
    /// Load configuration: defaults, then the TOML file if present, then
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, AgentError> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let raw = std::fs::read_to_string(p)?;
                toml::from_str::<AgentConfig>(&raw)
                    .map_err(|e| AgentError::InvalidConfig(format!("{}: {e}", p.display())))?
            }
            _ => AgentConfig::default(),
        };

        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            config.google_api_key = key;
        }
        if let Ok(url) = std::env::var("QDRANT_URL") {
            config.qdrant_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject shapes that would make the pipeline misbehave silently.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.embedding_batch_size == 0 {
            return Err(invalid("embedding_batch_size must be at least 1"));
        }
        if self.requests_per_minute == 0 {
            return Err(invalid("requests_per_minute must be at least 1"));
        }
        if self.vector_size == 0 {
            return Err(invalid("vector_size must be at least 1"));
        }
        if self.retrieval_top_k == 0 {
            return Err(invalid("retrieval_top_k must be at least 1"));
        }
        if self.chunk_size == 0 {
            return Err(invalid("chunk_size must be at least 1"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(invalid("chunk_overlap must be smaller than chunk_size"));
        }
        if !self.decision_system_prompt.contains("{context}") {
            return Err(invalid("decision_system_prompt must contain {context}"));
        }
        if !self.decision_user_prompt.contains("{question}") {
            return Err(invalid("decision_user_prompt must contain {question}"));
        }
        if !self.answer_system_prompt.contains("{context}") {
            return Err(invalid("answer_system_prompt must contain {context}"));
        }
        if !self.answer_user_prompt.contains("{question}") {
            return Err(invalid("answer_user_prompt must contain {question}"));
        }
        Ok(())
    }

    /// Fail fast when the credential shared by embeddings and LLM calls is
    /// absent.
    pub fn require_api_key(&self) -> Result<(), AgentError> {
        if self.google_api_key.is_empty() {
            return Err(AgentError::MissingCredential("GOOGLE_API_KEY"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> AgentError {
    AgentError::InvalidConfig(msg.to_string())
}

/// Substitute `{context}` / `{question}` placeholders in a prompt template.
pub fn render_template(template: &str, context: Option<&str>, question: Option<&str>) -> String {
    let mut out = template.to_string();
    if let Some(context) = context {
        out = out.replace("{context}", context);
    }
    if let Some(question) = question {
        out = out.replace("{question}", question);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        AgentConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = AgentConfig {
            embedding_batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AgentError::InvalidConfig(_))
        ));
    }

    #[test]
    fn overlap_must_stay_below_chunk_size() {
        let config = AgentConfig {
            chunk_size: 100,
            chunk_overlap: 100,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn prompt_without_placeholder_is_rejected() {
        let config = AgentConfig {
            decision_system_prompt: "no placeholder here".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let config = AgentConfig::default();
        assert!(matches!(
            config.require_api_key(),
            Err(AgentError::MissingCredential("GOOGLE_API_KEY"))
        ));
    }

    #[test]
    fn template_rendering_substitutes_both_placeholders() {
        let rendered = render_template("C={context} Q={question}", Some("ctx"), Some("q"));
        assert_eq!(rendered, "C=ctx Q=q");
    }

    #[test]
    fn partial_toml_fills_remaining_fields_from_defaults() {
        let parsed: AgentConfig = toml::from_str("retrieval_top_k = 7").unwrap();
        assert_eq!(parsed.retrieval_top_k, 7);
        assert_eq!(parsed.vector_size, 768);
    }
}
