//! Generation model adapter.

use std::sync::Arc;

use crate::core::errors::RagError;
use crate::llm::provider::LlmProvider;
use crate::llm::types::{ChatMessage, ChatRequest};

/// Returned when the model answers with a well-formed but text-less result.
/// This is a soft fallback, not an error.
pub const NO_RESPONSE_FALLBACK: &str = "No response available";

pub struct GenerationClient {
    provider: Arc<dyn LlmProvider>,
    model_id: String,
    temperature: Option<f64>,
    max_tokens: Option<i32>,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn LlmProvider>, model_id: String) -> Self {
        Self {
            provider,
            model_id,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_sampling(mut self, temperature: Option<f64>, max_tokens: Option<i32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Sends the prompt to the generation model and returns its text.
    pub async fn generate(&self, messages: Vec<ChatMessage>) -> Result<String, RagError> {
        let mut request = ChatRequest::new(messages);
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;

        let completion = self.provider.chat(request, &self.model_id).await?;
        Ok(completion
            .text
            .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::ChatCompletion;
    use async_trait::async_trait;

    struct ScriptedChatProvider {
        text: Option<String>,
        fail: bool,
    }

    #[async_trait]
    impl LlmProvider for ScriptedChatProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn health_check(&self) -> Result<bool, RagError> {
            Ok(true)
        }

        async fn chat(
            &self,
            _request: ChatRequest,
            _model_id: &str,
        ) -> Result<ChatCompletion, RagError> {
            if self.fail {
                return Err(RagError::Generation("backend down".to_string()));
            }
            Ok(ChatCompletion {
                text: self.text.clone(),
            })
        }

        async fn embed(
            &self,
            _inputs: &[String],
            _model_id: &str,
        ) -> Result<Vec<Vec<f32>>, RagError> {
            Ok(vec![])
        }
    }

    fn client(text: Option<&str>, fail: bool) -> GenerationClient {
        GenerationClient::new(
            Arc::new(ScriptedChatProvider {
                text: text.map(|t| t.to_string()),
                fail,
            }),
            "chat-test".to_string(),
        )
    }

    #[tokio::test]
    async fn returns_model_text_verbatim() {
        let answer = client(Some("The answer is 4."), false)
            .generate(vec![ChatMessage::user("What is 2+2?")])
            .await
            .unwrap();
        assert_eq!(answer, "The answer is 4.");
    }

    #[tokio::test]
    async fn textless_result_yields_the_fallback_string() {
        let answer = client(None, false)
            .generate(vec![ChatMessage::user("anything")])
            .await
            .unwrap();
        assert_eq!(answer, NO_RESPONSE_FALLBACK);
    }

    #[tokio::test]
    async fn backend_errors_propagate() {
        let err = client(None, true)
            .generate(vec![ChatMessage::user("anything")])
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Generation(_)));
    }
}
