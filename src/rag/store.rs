//! NoteStore trait — abstract interface for note storage backends.
//!
//! The pipeline consumes the store through exactly two operations, insert and
//! search, so storage backends stay swappable. Score semantics belong to the
//! backend: the pipeline only relies on "higher is more similar" and compares
//! scores against a cutoff calibrated to the backend's documented range.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::RagError;

/// A persisted note. `id` is assigned by the store on insert; a note is
/// immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A note paired with its similarity score from one search call.
#[derive(Debug, Clone)]
pub struct ScoredNote {
    pub note: Note,
    pub score: f32,
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a note with its embedding and return it with its new id.
    ///
    /// Fails with `RagError::StoreWrite`. Inserting the same text twice
    /// creates two distinct notes.
    async fn insert(&self, text: &str, embedding: Vec<f32>) -> Result<Note, RagError>;

    /// Return up to `top_k` notes ordered by descending similarity to the
    /// query embedding.
    ///
    /// Fails with `RagError::StoreRead` on a backing-service error. An empty
    /// result is a normal outcome, not a failure.
    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredNote>, RagError>;
}
