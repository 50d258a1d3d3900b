use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::RagError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub top_k: Option<u64>,
    #[serde(default)]
    pub cutoff: Option<f64>,
    #[serde(default)]
    pub max_context_notes: Option<u64>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

pub async fn query(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QueryRequest>,
) -> Result<impl IntoResponse, RagError> {
    let mut options = state.rag.defaults().clone();
    if let Some(top_k) = payload.top_k {
        options.top_k = top_k.clamp(1, 20) as usize;
    }
    if let Some(cutoff) = payload.cutoff {
        options.cutoff = cutoff.clamp(-1.0, 1.0) as f32;
    }
    if let Some(max_notes) = payload.max_context_notes {
        options.max_context_notes = max_notes.clamp(1, 20) as usize;
    }
    if let Some(system_prompt) = payload.system_prompt {
        if !system_prompt.trim().is_empty() {
            options.system_prompt = system_prompt;
        }
    }

    let question = payload.text.unwrap_or_default();
    let answer = state.rag.answer_query_with(&question, options).await?;

    Ok(Json(json!({ "answer": answer })))
}
