use std::env;

use serde_json::Value;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8088";
const DEFAULT_GENERATION_MODEL: &str = "qwen2.5-7b-instruct";
const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text-v1.5";

/// Connection settings for the model backend, read from the `llm` section of
/// the config file. `RECALL_LLM_URL` and `RECALL_LLM_API_KEY` override the
/// file so secrets can stay out of it.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub generation_model: String,
    pub embedding_model: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<i32>,
}

impl LlmSettings {
    pub fn from_config(config: &Value) -> Self {
        let section = config.get("llm");

        let base_url = env::var("RECALL_LLM_URL").ok().unwrap_or_else(|| {
            section
                .and_then(|v| v.get("base_url"))
                .and_then(|v| v.as_str())
                .unwrap_or(DEFAULT_BASE_URL)
                .to_string()
        });

        let api_key = env::var("RECALL_LLM_API_KEY").ok().or_else(|| {
            section
                .and_then(|v| v.get("api_key"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        });

        let generation_model = section
            .and_then(|v| v.get("generation_model"))
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_GENERATION_MODEL)
            .to_string();

        let embedding_model = section
            .and_then(|v| v.get("embedding_model"))
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_EMBEDDING_MODEL)
            .to_string();

        let temperature = section
            .and_then(|v| v.get("temperature"))
            .and_then(|v| v.as_f64());

        let max_tokens = section
            .and_then(|v| v.get("max_tokens"))
            .and_then(|v| v.as_i64())
            .map(|v| v as i32);

        Self {
            base_url,
            api_key,
            generation_model,
            embedding_model,
            temperature,
            max_tokens,
        }
    }
}
