/// A single non-streaming completion call.
///
/// The pipeline has two independently configured call sites (decision and
/// answer); each builds its own request with its own model, token bound,
/// and rendered prompts.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(model: &str, system_prompt: String, user_prompt: String) -> Self {
        Self {
            model: model.to_string(),
            system_prompt,
            user_prompt,
            max_tokens: 256,
            temperature: 0.3,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}
