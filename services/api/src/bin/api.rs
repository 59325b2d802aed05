//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{JsonFileStore, JsonTemplateSource},
    config::Config,
    error::ApiError,
    web::{api_router, not_found_handler, ApiDoc, AppState},
};
use axum::http::{header::CONTENT_TYPE, Method};
use axum::Router;
use qa_checklist_core::{HistoryManager, SessionManager, StorageService, TemplateService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Prepare the Data Directory ---
    tokio::fs::create_dir_all(&config.data_dir).await?;
    if !config.default_checklist_path.exists() {
        warn!(
            "default checklist template not found at {}; sessions will start with an empty checklist",
            config.default_checklist_path.display()
        );
    }

    // --- 3. Build Adapters & Managers ---
    let store: Arc<dyn StorageService> = Arc::new(JsonFileStore::new(config.data_dir.clone()));
    let templates: Arc<dyn TemplateService> =
        Arc::new(JsonTemplateSource::new(config.default_checklist_path.clone()));
    let history = Arc::new(HistoryManager::new(store.clone()));
    let sessions = Arc::new(SessionManager::new(store, templates, history.clone()));

    // --- 4. Seed the Data Files ---
    // Both documents exist (and are valid) before the first request arrives;
    // a corrupt file from a previous run is healed here.
    sessions.current().await?;
    history.list().await?;
    info!("Data files ready in {}", config.data_dir.display());

    // --- 5. Create the Web Router ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    let app_state = Arc::new(AppState {
        sessions,
        history,
        config: config.clone(),
    });
    let app = Router::new()
        .merge(api_router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found_handler)
        .layer(cors);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
