//! Answer synthesis from a single context block.

use std::sync::Arc;

use crate::config::render_template;
use crate::llm::{CompletionRequest, LlmProvider};
use crate::sentinels;

pub struct AnswerSynthesizer {
    llm: Arc<dyn LlmProvider>,
    model: String,
    system_template: String,
    user_template: String,
    max_tokens: u32,
}

impl AnswerSynthesizer {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        model: String,
        system_template: String,
        user_template: String,
        max_tokens: u32,
    ) -> Self {
        Self {
            llm,
            model,
            system_template,
            user_template,
            max_tokens,
        }
    }

    /// Answer `question` strictly from `context`. Never fails outward: a
    /// provider failure yields [`sentinels::ANSWER_FAILURE`], which is
    /// distinct from the model-generated refusal sentence.
    pub async fn synthesize(&self, context: &str, question: &str) -> String {
        let request = CompletionRequest::new(
            &self.model,
            render_template(&self.system_template, Some(context), None),
            render_template(&self.user_template, None, Some(question)),
        )
        .with_max_tokens(self.max_tokens);

        match self.llm.complete(&request).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::error!("answer synthesis failed: {err}");
                sentinels::ANSWER_FAILURE.to_string()
            }
        }
    }
}
