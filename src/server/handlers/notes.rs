use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::RagError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub text: Option<String>,
}

pub async fn create_note(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, RagError> {
    let text = payload.text.unwrap_or_default();
    let note = state.rag.ingest_note(&text).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "text": note.text,
            "note": note,
        })),
    ))
}
