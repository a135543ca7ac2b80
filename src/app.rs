//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use std::sync::Arc;

use actix_web::web;

use crate::api;
use crate::db::ReviewStore;
use crate::db::repository::ReviewRepository;
use crate::model::Config;
use crate::service::{AnalysisService, ChatService, HistoryService, LlmClient, TextGenerator};

/// Application state containing all services and shared resources
#[derive(Clone)]
pub struct AppState {
    /// Review store (optional)
    pub store: Option<Arc<dyn ReviewStore>>,
    /// RCA analysis service
    pub analysis_service: Arc<AnalysisService>,
    /// Session chat and comment reply service
    pub chat_service: Arc<ChatService>,
    /// Stored analyses and transcripts
    pub history_service: Arc<HistoryService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Database connection and schema initialization (optional)
    /// 2. LLM client initialization (requires OPENAI_API_KEY)
    /// 3. Service construction
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        // Without a database analyses still work; chat and history fail per request
        let store = match Self::connect_store().await {
            Ok(store) => {
                tracing::info!("Review store enabled");
                Some(store)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Database unavailable, running without review store");
                None
            }
        };

        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AppError::MissingConfig("OPENAI_API_KEY"))?;

        let llm_client = LlmClient::new(&api_key)
            .map_err(|_| AppError::InvalidConfig("Invalid OPENAI_API_KEY"))?;

        Ok(Self::with_collaborators(config, Arc::new(llm_client), store))
    }

    /// Build state from an existing LLM client and store
    pub fn with_collaborators(
        config: &Config,
        llm: Arc<dyn TextGenerator>,
        store: Option<Arc<dyn ReviewStore>>,
    ) -> Self {
        let analysis_service = Arc::new(AnalysisService::new(
            Arc::clone(&llm),
            store.clone(),
            &config.llm,
        ));
        let chat_service = Arc::new(ChatService::new(
            llm,
            store.clone(),
            &config.llm,
            &config.history,
        ));
        let history_service = Arc::new(HistoryService::new(store.clone(), &config.history));

        Self {
            store,
            analysis_service,
            chat_service,
            history_service,
        }
    }

    async fn connect_store() -> Result<Arc<dyn ReviewStore>, crate::db::DbError> {
        let pool = crate::db::create_pool().await?;
        crate::db::init_schema(&pool).await?;
        Ok(Arc::new(ReviewRepository::new(pool)))
    }

    /// Register shared state and routes, at the root and under `/api`
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(Arc::clone(&self.analysis_service)))
            .app_data(web::Data::from(Arc::clone(&self.chat_service)))
            .app_data(web::Data::from(Arc::clone(&self.history_service)))
            .app_data(web::Data::new(self.store.clone()))
            .service(web::scope("/api").configure(api::configure))
            .configure(api::configure)
            .default_service(web::to(api::not_found));
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
