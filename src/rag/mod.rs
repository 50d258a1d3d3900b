//! RAG (Retrieval-Augmented Generation) module.
//!
//! This module provides:
//! - `NoteStore`: abstract storage interface with a SQLite implementation
//! - `EmbeddingClient` / `GenerationClient`: model adapters with the
//!   pipeline's dimensionality and fallback rules
//! - `ContextAssembler`: cutoff-and-bound selection of retrieved notes
//! - `RagService`: the ingest and answer pipelines

pub mod context;
pub mod embedding;
pub mod generation;
pub mod prompt;
pub mod service;
pub mod sqlite;
pub mod store;

pub use context::{ContextAssembler, RetrievalContext};
pub use embedding::EmbeddingClient;
pub use generation::{GenerationClient, NO_RESPONSE_FALLBACK};
pub use service::{QueryOptions, RagService};
pub use sqlite::SqliteNoteStore;
pub use store::{Note, NoteStore, ScoredNote};
