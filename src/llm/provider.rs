use async_trait::async_trait;

use super::types::{ChatCompletion, ChatRequest};
use crate::core::errors::RagError;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// return the provider name (e.g. "openai_compat")
    fn name(&self) -> &str;

    /// check if the provider is healthy/reachable
    async fn health_check(&self) -> Result<bool, RagError>;

    /// chat completion (non-streaming); errors surface as `RagError::Generation`
    async fn chat(&self, request: ChatRequest, model_id: &str)
        -> Result<ChatCompletion, RagError>;

    /// generate embeddings; errors surface as `RagError::Embedding`
    async fn embed(&self, inputs: &[String], model_id: &str) -> Result<Vec<Vec<f32>>, RagError>;
}
