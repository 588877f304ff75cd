//! Mock provider for deterministic testing

use async_trait::async_trait;
use docchat_domain::{GenerationError, LlmProvider};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct MockState {
    responses: HashMap<String, Result<String, GenerationError>>,
    failure: Option<GenerationError>,
    prompts: Vec<String>,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network
/// calls. Clones share state, so a test can keep a handle while the session
/// owns the provider and inspect every prompt it received.
///
/// # Examples
///
/// ```
/// use docchat_llm::MockProvider;
/// use docchat_domain::LlmProvider;
///
/// # tokio_test::block_on(async {
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt").await.unwrap(), "Fixed response");
///
/// // Multiple responses
/// let provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response("prompt2", "response2");
/// assert_eq!(provider.generate("prompt1").await.unwrap(), "response1");
/// assert_eq!(provider.generate("prompt2").await.unwrap(), "response2");
/// assert_eq!(provider.call_count(), 2);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Create a provider whose every call fails with `error`
    pub fn failing(error: GenerationError) -> Self {
        let provider = Self::default();
        provider.fail_with(error);
        provider
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&self, prompt: impl Into<String>, response: impl Into<String>) {
        self.state().responses.insert(prompt.into(), Ok(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&self, prompt: impl Into<String>, error: GenerationError) {
        self.state().responses.insert(prompt.into(), Err(error));
    }

    /// Fail every call from now on
    pub fn fail_with(&self, error: GenerationError) {
        self.state().failure = Some(error);
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.state().prompts.len()
    }

    /// Every prompt received, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.state().prompts.clone()
    }

    /// The most recent prompt, if any
    pub fn last_prompt(&self) -> Option<String> {
        self.state().prompts.last().cloned()
    }

    /// Reset the call count and recorded prompts
    pub fn reset_call_count(&self) {
        self.state().prompts.clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut state = self.state();
        state.prompts.push(prompt.to_string());

        if let Some(error) = &state.failure {
            return Err(error.clone());
        }

        match state.responses.get(prompt) {
            Some(response) => response.clone(),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
