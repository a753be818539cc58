// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::analysis_gateway::AnalysisGateway;
use crate::application::analysis_session::AnalysisSession;
use crate::application::chat_service::ChatService;
use crate::application::history_store::HistoryStore;
use crate::application::key_value_storage::KeyValueStorage;
use crate::application::project_service::ProjectService;
use crate::infrastructure::config::{StorageBackend, load_app_config};
use crate::infrastructure::file_storage::FileStorage;
use crate::infrastructure::gemini_gateway::GeminiGateway;
use crate::infrastructure::memory_storage::InMemoryStorage;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config()?;
    if app_config.gemini.api_key.is_none() {
        tracing::warn!("No Gemini API key configured; analysis requests will fail until one is set");
    }

    // Create storage and gateway (infrastructure layer)
    let storage: Arc<dyn KeyValueStorage> = match app_config.history.backend {
        StorageBackend::File => {
            let storage = FileStorage::new(&app_config.history.storage_dir, app_config.history.quota_bytes);
            tracing::info!("Persisting history under {}", storage.dir().display());
            Arc::new(storage)
        }
        StorageBackend::Memory => {
            tracing::info!("Keeping history in memory only");
            let storage = InMemoryStorage::new();
            storage.set_quota(app_config.history.quota_bytes);
            Arc::new(storage)
        }
    };
    let gateway: Arc<dyn AnalysisGateway> = Arc::new(GeminiGateway::new(&app_config.gemini)?);

    // Create services (application layer)
    let history = Arc::new(HistoryStore::open(storage, app_config.history.storage_key.clone()));
    let session = Arc::new(AnalysisSession::new(gateway.clone(), history));
    let chat = Arc::new(ChatService::new(gateway.clone()));
    let projects = ProjectService::new(gateway);

    // Create application state
    let state = Arc::new(AppState {
        session,
        chat,
        projects,
    });

    // Build router (presentation layer)
    let router = build_router(state, app_config.server.max_upload_bytes);

    // Start server
    let addr: SocketAddr = app_config.server.bind_addr.parse()?;
    tracing::info!("Starting pcb-salvage on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
