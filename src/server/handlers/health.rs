use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::core::errors::RagError;
use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let generation_backend = state.provider.health_check().await.unwrap_or(false);

    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "generation_backend": generation_backend,
    }))
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, RagError> {
    let notes = state.store.count().await?;

    Ok(Json(json!({
        "notes": notes,
        "query_defaults": state.rag.defaults(),
        "started_at": state.started_at.to_rfc3339(),
    })))
}
