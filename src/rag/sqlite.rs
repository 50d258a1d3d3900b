//! SQLite-backed note store.
//!
//! In-process store using SQLite for persistence and brute-force cosine
//! similarity for search. Scores are cosine similarity in [-1, 1]; the
//! default cutoff shipped in configuration is calibrated to this range.

use std::path::PathBuf;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};

use super::store::{Note, NoteStore, ScoredNote};
use crate::core::config::AppPaths;
use crate::core::errors::RagError;

pub struct SqliteNoteStore {
    pool: SqlitePool,
    #[allow(dead_code)]
    db_path: PathBuf,
}

impl SqliteNoteStore {
    pub async fn new(paths: &AppPaths) -> Result<Self, RagError> {
        Self::with_path(paths.db_path.clone()).await
    }

    pub async fn with_path(db_path: PathBuf) -> Result<Self, RagError> {
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(RagError::store_write)?;

        let store = Self { pool, db_path };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), RagError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS notes (
                id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                embedding BLOB NOT NULL,
                created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(RagError::store_write)?;

        Ok(())
    }

    /// Number of stored notes, exposed for the status endpoint.
    pub async fn count(&self) -> Result<usize, RagError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(&self.pool)
            .await
            .map_err(RagError::store_read)?;

        Ok(count as usize)
    }

    fn serialize_embedding(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() || a.is_empty() {
            return 0.0;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        let denom = norm_a * norm_b;

        if denom <= f32::EPSILON {
            0.0
        } else {
            dot / denom
        }
    }
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    async fn insert(&self, text: &str, embedding: Vec<f32>) -> Result<Note, RagError> {
        let id = uuid::Uuid::new_v4().to_string();
        let blob = Self::serialize_embedding(&embedding);

        sqlx::query("INSERT INTO notes (id, text, embedding) VALUES (?1, ?2, ?3)")
            .bind(&id)
            .bind(text)
            .bind(&blob)
            .execute(&self.pool)
            .await
            .map_err(RagError::store_write)?;

        Ok(Note {
            id,
            text: text.to_string(),
            embedding,
        })
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredNote>, RagError> {
        let rows = sqlx::query("SELECT id, text, embedding FROM notes")
            .fetch_all(&self.pool)
            .await
            .map_err(RagError::store_read)?;

        let mut scored: Vec<ScoredNote> = rows
            .iter()
            .filter_map(|row| {
                let embedding_bytes: Vec<u8> = row.get("embedding");
                if embedding_bytes.is_empty() {
                    return None;
                }
                let embedding = Self::deserialize_embedding(&embedding_bytes);
                let score = Self::cosine_similarity(query_embedding, &embedding);

                Some(ScoredNote {
                    note: Note {
                        id: row.get("id"),
                        text: row.get("text"),
                        embedding,
                    },
                    score,
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);

        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store(dir: &tempfile::TempDir) -> SqliteNoteStore {
        SqliteNoteStore::with_path(dir.path().join("notes-test.db"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_keeps_text_exact() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir).await;

        let note = store
            .insert("Paris is the capital of France.", vec![1.0, 0.0, 0.0])
            .await
            .unwrap();

        assert!(!note.id.is_empty());
        assert_eq!(note.text, "Paris is the capital of France.");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_text_creates_distinct_notes() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir).await;

        let first = store.insert("same text", vec![1.0, 0.0]).await.unwrap();
        let second = store.insert("same text", vec![1.0, 0.0]).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn search_orders_by_descending_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir).await;

        store.insert("far", vec![0.0, 1.0, 0.0]).await.unwrap();
        store.insert("near", vec![1.0, 0.0, 0.0]).await.unwrap();
        store.insert("middle", vec![0.7, 0.7, 0.0]).await.unwrap();

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].note.text, "near");
        assert_eq!(results[1].note.text, "middle");
        assert_eq!(results[2].note.text, "far");
        assert!(results[0].score > results[1].score);
        assert!(results[1].score > results[2].score);
    }

    #[tokio::test]
    async fn search_respects_top_k() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir).await;

        for i in 0..5 {
            store
                .insert(&format!("note {i}"), vec![1.0, i as f32])
                .await
                .unwrap();
        }

        let results = store.search(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn empty_store_returns_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir).await;

        let results = store.search(&[1.0, 0.0], 5).await.unwrap();
        assert!(results.is_empty());
    }
}
