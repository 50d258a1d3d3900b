//! Retrieval-augmented query pipeline.
//!
//! `RagService` composes the embedding client, the note store, context
//! assembly, prompt construction and the generation client into the two
//! user-facing operations: ingesting a note and answering a question. Each
//! call is a sequential pipeline; the first failing stage ends the request.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::context::ContextAssembler;
use super::embedding::EmbeddingClient;
use super::generation::GenerationClient;
use super::prompt::build_prompt;
use super::store::{Note, NoteStore};
use crate::core::errors::RagError;

/// Question substituted when a query arrives without text. A documented
/// fallback, not an error path.
pub const DEFAULT_QUESTION: &str = "What is the square root of 9?";

/// Instruction prompt used when the configuration does not override it.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "When answering the question or responding, use the context provided, if it is provided and relevant.";

/// Default relevance cutoff, calibrated to the [-1, 1] cosine score range of
/// the bundled SQLite store. A store with different score semantics needs a
/// recalibrated value in configuration.
pub const DEFAULT_CUTOFF: f32 = 0.6;

const DEFAULT_TOP_K: usize = 2;
const DEFAULT_MAX_CONTEXT_NOTES: usize = 2;

/// Tunables for one answer_query invocation.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOptions {
    pub top_k: usize,
    pub cutoff: f32,
    pub max_context_notes: usize,
    pub system_prompt: String,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            cutoff: DEFAULT_CUTOFF,
            max_context_notes: DEFAULT_MAX_CONTEXT_NOTES,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl QueryOptions {
    /// Reads the `query` section of the config, falling back to defaults and
    /// clamping out-of-range values.
    pub fn from_config(config: &Value) -> Self {
        let section = config.get("query");
        let defaults = Self::default();

        let top_k = section
            .and_then(|v| v.get("top_k"))
            .and_then(|v| v.as_u64())
            .map(|v| v.clamp(1, 20) as usize)
            .unwrap_or(defaults.top_k);

        let cutoff = section
            .and_then(|v| v.get("cutoff"))
            .and_then(|v| v.as_f64())
            .map(|v| v.clamp(-1.0, 1.0) as f32)
            .unwrap_or(defaults.cutoff);

        let max_context_notes = section
            .and_then(|v| v.get("max_context_notes"))
            .and_then(|v| v.as_u64())
            .map(|v| v.clamp(1, 20) as usize)
            .unwrap_or(defaults.max_context_notes);

        let system_prompt = section
            .and_then(|v| v.get("system_prompt"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.to_string())
            .unwrap_or(defaults.system_prompt);

        Self {
            top_k,
            cutoff,
            max_context_notes,
            system_prompt,
        }
    }
}

pub struct RagService {
    store: Arc<dyn NoteStore>,
    embedder: EmbeddingClient,
    generator: GenerationClient,
    defaults: QueryOptions,
}

impl RagService {
    pub fn new(
        store: Arc<dyn NoteStore>,
        embedder: EmbeddingClient,
        generator: GenerationClient,
        defaults: QueryOptions,
    ) -> Self {
        Self {
            store,
            embedder,
            generator,
            defaults,
        }
    }

    pub fn defaults(&self) -> &QueryOptions {
        &self.defaults
    }

    /// Embeds and persists one note. The note text is stored exactly as
    /// submitted; the single write happens only after embedding succeeds.
    pub async fn ingest_note(&self, text: &str) -> Result<Note, RagError> {
        if text.trim().is_empty() {
            return Err(RagError::Validation("note text is required".to_string()));
        }

        let embedding = self.embedder.embed_one(text).await?;
        let note = self.store.insert(text, embedding).await?;

        tracing::debug!(note_id = %note.id, "ingested note");
        Ok(note)
    }

    /// Answers a question against the stored notes using the configured
    /// defaults.
    pub async fn answer_query(&self, question: &str) -> Result<String, RagError> {
        self.answer_query_with(question, self.defaults.clone())
            .await
    }

    /// Answers a question with explicit per-request options.
    pub async fn answer_query_with(
        &self,
        question: &str,
        options: QueryOptions,
    ) -> Result<String, RagError> {
        let question = if question.trim().is_empty() {
            DEFAULT_QUESTION
        } else {
            question
        };

        let query_embedding = self.embedder.embed_one(question).await?;
        let scored_notes = self.store.search(&query_embedding, options.top_k).await?;

        let context = ContextAssembler::new(options.cutoff, options.max_context_notes)
            .assemble(&scored_notes);

        tracing::debug!(
            retrieved = scored_notes.len(),
            selected = context.len(),
            "assembled query context"
        );

        let prompt = build_prompt(&options.system_prompt, &context, question);
        self.generator.generate(prompt).await
    }
}
