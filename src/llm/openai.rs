use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::LlmProvider;
use super::types::{ChatCompletion, ChatRequest};
use crate::core::errors::RagError;

/// Client for any OpenAI-compatible inference server (llama.cpp, LM Studio,
/// vLLM, hosted APIs). One instance is shared across all requests.
#[derive(Clone)]
pub struct OpenAiCompatProvider {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl OpenAiCompatProvider {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: Client::new(),
        }
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.post(url);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai_compat"
    }

    async fn health_check(&self) -> Result<bool, RagError> {
        let url = format!("{}/v1/models", self.base_url);
        let mut builder = self.client.get(&url);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        match builder.send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn chat(
        &self,
        request: ChatRequest,
        model_id: &str,
    ) -> Result<ChatCompletion, RagError> {
        let mut body = json!({
            "model": model_id,
            "messages": request.messages,
            "stream": false,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(t) = request.temperature {
                obj.insert("temperature".to_string(), json!(t));
            }
            if let Some(t) = request.max_tokens {
                obj.insert("max_tokens".to_string(), json!(t));
            }
        }

        let res = self
            .post("/v1/chat/completions")
            .json(&body)
            .send()
            .await
            .map_err(RagError::generation)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(RagError::Generation(format!(
                "chat backend returned {}: {}",
                status, text
            )));
        }

        // We asked for a non-streamed completion; an event stream coming back
        // anyway is a shape we refuse to consume.
        let is_event_stream = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/event-stream"));
        if is_event_stream {
            return Err(RagError::Generation(
                "chat backend returned an unexpected streaming response".to_string(),
            ));
        }

        let payload: Value = res.json().await.map_err(RagError::generation)?;
        completion_from_payload(&payload)
    }

    async fn embed(&self, inputs: &[String], model_id: &str) -> Result<Vec<Vec<f32>>, RagError> {
        let body = json!({
            "model": model_id,
            "input": inputs,
        });

        let res = self
            .post("/v1/embeddings")
            .json(&body)
            .send()
            .await
            .map_err(RagError::embedding)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(RagError::Embedding(format!(
                "embedding backend returned {}: {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(RagError::embedding)?;
        vectors_from_payload(&payload)
    }
}

/// Maps an OpenAI chat payload to a completion.
///
/// A missing or null `content` is a well-formed, text-less answer and maps to
/// `text: None`; any other deviation from the expected shape is an error.
fn completion_from_payload(payload: &Value) -> Result<ChatCompletion, RagError> {
    let choices = payload
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            RagError::Generation("chat response carries no choices array".to_string())
        })?;

    let message = choices
        .first()
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| RagError::Generation("chat response carries no message".to_string()))?;

    let text = match message.get("content") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            return Err(RagError::Generation(
                "chat response content is not text".to_string(),
            ))
        }
    };

    Ok(ChatCompletion { text })
}

/// Parses the embedding payload strictly: every vector element must be a
/// number, and the data array must be present. Nothing is dropped or padded.
fn vectors_from_payload(payload: &Value) -> Result<Vec<Vec<f32>>, RagError> {
    let data = payload
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| RagError::Embedding("embedding response carries no data".to_string()))?;

    let mut vectors = Vec::with_capacity(data.len());
    for item in data {
        let values = item
            .get("embedding")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                RagError::Embedding("embedding response item carries no vector".to_string())
            })?;

        let mut vector = Vec::with_capacity(values.len());
        for value in values {
            let number = value.as_f64().ok_or_else(|| {
                RagError::Embedding("embedding vector contains a non-numeric value".to_string())
            })?;
            vector.push(number as f32);
        }
        vectors.push(vector);
    }

    Ok(vectors)
}
