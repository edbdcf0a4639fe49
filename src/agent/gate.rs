//! Relevance gate: can the retrieved context answer the question?
//!
//! The gate asks the decision model for a single binary digit and resolves
//! the raw reply into a total [`Decision`]. Anything ambiguous (no digit in
//! the reply, or the call failing outright) resolves to `Insufficient`:
//! widening the search on a false negative is cheaper than answering from
//! irrelevant context on a false positive.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::config::render_template;
use crate::llm::{CompletionRequest, LlmProvider};

const DECISION_MAX_TOKENS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Sufficient,
    Insufficient,
}

pub struct RelevanceGate {
    llm: Arc<dyn LlmProvider>,
    model: String,
    system_template: String,
    user_template: String,
}

impl RelevanceGate {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        model: String,
        system_template: String,
        user_template: String,
    ) -> Self {
        Self {
            llm,
            model,
            system_template,
            user_template,
        }
    }

    /// Decide whether `context` suffices to answer `question`. Total: every
    /// invocation resolves to exactly one [`Decision`].
    pub async fn decide(&self, context: &str, question: &str) -> Decision {
        let request = CompletionRequest::new(
            &self.model,
            render_template(&self.system_template, Some(context), None),
            render_template(&self.user_template, None, Some(question)),
        )
        .with_max_tokens(DECISION_MAX_TOKENS);

        match self.llm.complete(&request).await {
            Ok(raw) => {
                let decision = parse_decision(&raw);
                tracing::debug!(
                    "gate raw output '{}' -> {:?}",
                    raw.chars().take(50).collect::<String>(),
                    decision
                );
                decision
            }
            Err(err) => {
                tracing::warn!("decision call failed, defaulting to insufficient: {err}");
                Decision::Insufficient
            }
        }
    }
}

/// Two-stage parse: an isolated 0/1 first, any 0/1 second, otherwise the
/// safe default.
pub fn parse_decision(raw: &str) -> Decision {
    static ISOLATED: OnceLock<Regex> = OnceLock::new();
    static ANYWHERE: OnceLock<Regex> = OnceLock::new();

    let isolated = ISOLATED.get_or_init(|| Regex::new(r"\b([01])\b").unwrap());
    let anywhere = ANYWHERE.get_or_init(|| Regex::new(r"([01])").unwrap());

    let digit = isolated
        .captures(raw)
        .or_else(|| anywhere.captures(raw))
        .map(|c| c[1].to_string());

    match digit.as_deref() {
        Some("1") => Decision::Sufficient,
        Some(_) => Decision::Insufficient,
        None => {
            tracing::warn!(
                "decision output contained no 0/1, defaulting to insufficient: '{}'",
                raw.chars().take(100).collect::<String>()
            );
            Decision::Insufficient
        }
    }
}
