use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::config::{AppPaths, ConfigService};
use crate::llm::openai::OpenAiCompatProvider;
use crate::llm::{LlmProvider, LlmSettings};
use crate::rag::{EmbeddingClient, GenerationClient, QueryOptions, RagService, SqliteNoteStore};

#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: ConfigService,
    pub provider: Arc<dyn LlmProvider>,
    pub store: Arc<SqliteNoteStore>,
    pub rag: Arc<RagService>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub async fn initialize() -> anyhow::Result<Arc<Self>> {
        let paths = Arc::new(AppPaths::new());
        let config_service = ConfigService::new(paths.clone());
        let config = config_service.load_config();

        let llm = LlmSettings::from_config(&config);
        let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiCompatProvider::new(
            llm.base_url.clone(),
            llm.api_key.clone(),
        ));

        let store = Arc::new(SqliteNoteStore::new(&paths).await?);
        let embedder = EmbeddingClient::new(provider.clone(), llm.embedding_model.clone());
        let generator = GenerationClient::new(provider.clone(), llm.generation_model.clone())
            .with_sampling(llm.temperature, llm.max_tokens);
        let defaults = QueryOptions::from_config(&config);

        let rag = Arc::new(RagService::new(
            store.clone(),
            embedder,
            generator,
            defaults,
        ));
        let started_at = Utc::now();

        Ok(Arc::new(AppState {
            paths,
            config: config_service,
            provider,
            store,
            rag,
            started_at,
        }))
    }
}
