use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy for the retrieval-augmented pipeline.
///
/// Each variant names the stage that failed. A request either runs every
/// stage to completion or stops at the first failing one; nothing is retried
/// at this layer.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("embedding failed: {0}")]
    Embedding(String),
    #[error("note store write failed: {0}")]
    StoreWrite(String),
    #[error("note store read failed: {0}")]
    StoreRead(String),
    #[error("generation failed: {0}")]
    Generation(String),
}

impl RagError {
    pub fn validation<E: std::fmt::Display>(err: E) -> Self {
        RagError::Validation(err.to_string())
    }

    pub fn embedding<E: std::fmt::Display>(err: E) -> Self {
        RagError::Embedding(err.to_string())
    }

    pub fn store_write<E: std::fmt::Display>(err: E) -> Self {
        RagError::StoreWrite(err.to_string())
    }

    pub fn store_read<E: std::fmt::Display>(err: E) -> Self {
        RagError::StoreRead(err.to_string())
    }

    pub fn generation<E: std::fmt::Display>(err: E) -> Self {
        RagError::Generation(err.to_string())
    }

    /// Stable identifier for the failing stage, reported alongside the
    /// message so callers can tell the failure kinds apart.
    pub fn stage(&self) -> &'static str {
        match self {
            RagError::Validation(_) => "validation",
            RagError::Embedding(_) => "embedding",
            RagError::StoreWrite(_) => "store_write",
            RagError::StoreRead(_) => "store_read",
            RagError::Generation(_) => "generation",
        }
    }
}

impl IntoResponse for RagError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            RagError::Validation(_) => StatusCode::BAD_REQUEST,
            RagError::Embedding(_) | RagError::Generation(_) => StatusCode::BAD_GATEWAY,
            RagError::StoreWrite(_) | RagError::StoreRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "stage": self.stage(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_distinct() {
        let errors = [
            RagError::Validation("x".into()),
            RagError::Embedding("x".into()),
            RagError::StoreWrite("x".into()),
            RagError::StoreRead("x".into()),
            RagError::Generation("x".into()),
        ];

        let mut stages: Vec<&str> = errors.iter().map(|e| e.stage()).collect();
        stages.sort_unstable();
        stages.dedup();
        assert_eq!(stages.len(), errors.len());
    }

    #[test]
    fn messages_name_the_failing_dependency() {
        let err = RagError::embedding("connection refused");
        assert_eq!(err.to_string(), "embedding failed: connection refused");

        let err = RagError::store_read("disk offline");
        assert_eq!(err.to_string(), "note store read failed: disk offline");
    }
}
