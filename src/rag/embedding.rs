//! Embedding model adapter.

use std::sync::{Arc, OnceLock};

use crate::core::errors::RagError;
use crate::llm::provider::LlmProvider;

/// Client for the embedding model.
///
/// The first successful call pins the model's output dimensionality for the
/// life of the client; any later vector of a different length fails the call
/// instead of being truncated or padded to fit.
pub struct EmbeddingClient {
    provider: Arc<dyn LlmProvider>,
    model_id: String,
    dimension: OnceLock<usize>,
}

impl EmbeddingClient {
    pub fn new(provider: Arc<dyn LlmProvider>, model_id: String) -> Self {
        Self {
            provider,
            model_id,
            dimension: OnceLock::new(),
        }
    }

    /// The pinned dimensionality, once a call has succeeded.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension.get().copied()
    }

    /// Embeds a batch of texts, returning one vector per input in input
    /// order.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        if texts.is_empty() || texts.iter().any(|t| t.trim().is_empty()) {
            return Err(RagError::Embedding(
                "embedding input must be non-empty text".to_string(),
            ));
        }

        let vectors = self.provider.embed(texts, &self.model_id).await?;

        if vectors.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "expected {} vectors, model returned {}",
                texts.len(),
                vectors.len()
            )));
        }

        let expected = match self.dimension.get() {
            Some(dim) => *dim,
            None => vectors[0].len(),
        };
        if expected == 0 {
            return Err(RagError::Embedding(
                "model returned an empty vector".to_string(),
            ));
        }
        for vector in &vectors {
            if vector.len() != expected {
                return Err(RagError::Embedding(format!(
                    "vector dimensionality {} does not match the established {}",
                    vector.len(),
                    expected
                )));
            }
        }

        let _ = self.dimension.set(expected);
        Ok(vectors)
    }

    /// Embeds a single text.
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let input = [text.to_string()];
        let vectors = self.embed(&input).await?;
        vectors
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("model returned no vectors".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::{ChatCompletion, ChatRequest};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedVectorProvider {
        responses: Mutex<Vec<Vec<Vec<f32>>>>,
    }

    impl FixedVectorProvider {
        fn new(responses: Vec<Vec<Vec<f32>>>) -> Self {
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for FixedVectorProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn health_check(&self) -> Result<bool, RagError> {
            Ok(true)
        }

        async fn chat(
            &self,
            _request: ChatRequest,
            _model_id: &str,
        ) -> Result<ChatCompletion, RagError> {
            Ok(ChatCompletion { text: None })
        }

        async fn embed(
            &self,
            _inputs: &[String],
            _model_id: &str,
        ) -> Result<Vec<Vec<f32>>, RagError> {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(RagError::Embedding("no scripted response".to_string()));
            }
            Ok(responses.remove(0))
        }
    }

    fn client(responses: Vec<Vec<Vec<f32>>>) -> EmbeddingClient {
        EmbeddingClient::new(
            Arc::new(FixedVectorProvider::new(responses)),
            "embed-test".to_string(),
        )
    }

    #[tokio::test]
    async fn first_success_pins_the_dimension() {
        let client = client(vec![
            vec![vec![1.0, 0.0, 0.0]],
            vec![vec![0.0, 1.0, 0.0]],
        ]);

        assert!(client.dimension().is_none());
        client.embed_one("first").await.unwrap();
        assert_eq!(client.dimension(), Some(3));

        client.embed_one("second").await.unwrap();
        assert_eq!(client.dimension(), Some(3));
    }

    #[tokio::test]
    async fn later_dimension_mismatch_fails() {
        let client = client(vec![vec![vec![1.0, 0.0, 0.0]], vec![vec![1.0, 0.0]]]);

        client.embed_one("first").await.unwrap();
        let err = client.embed_one("second").await.unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
        // The pin survives the failed call.
        assert_eq!(client.dimension(), Some(3));
    }

    #[tokio::test]
    async fn mixed_dimensions_within_one_batch_fail() {
        let client = client(vec![vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]]]);

        let texts = vec!["a".to_string(), "b".to_string()];
        let err = client.embed(&texts).await.unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
        assert!(client.dimension().is_none());
    }

    #[tokio::test]
    async fn vector_count_mismatch_fails() {
        let client = client(vec![vec![vec![1.0, 0.0]]]);

        let texts = vec!["a".to_string(), "b".to_string()];
        let err = client.embed(&texts).await.unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let client = client(vec![]);

        let err = client.embed(&[]).await.unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));

        let err = client.embed(&["  ".to_string()]).await.unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
    }
}
