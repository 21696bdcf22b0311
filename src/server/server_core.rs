//! Server wiring and lifecycle

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::error::{Result, TtsError};
use crate::engine::loader::SidecarLoader;
use crate::engine::{EngineCache, ModelCatalog};
use crate::pipeline::GenerationPipeline;
use crate::server::config::ServerConfig;
use crate::server::routes;
use crate::task::TaskCoordinator;

/// Shared state handed to every route handler
#[derive(Clone)]
pub struct ServerState {
    pub coordinator: Arc<TaskCoordinator>,
    pub catalog: Arc<ModelCatalog>,
}

impl ServerState {
    /// Build state from configuration
    pub fn new(config: &ServerConfig) -> Self {
        let loader = SidecarLoader::new(config.sidecar.clone());
        let cache = Arc::new(EngineCache::new(Box::new(loader), config.cache_capacity));
        let pipeline = Arc::new(GenerationPipeline::new(cache, config.generation.clone()));
        let coordinator = Arc::new(TaskCoordinator::new(pipeline, config.coordinator.clone()));

        Self {
            coordinator,
            catalog: Arc::new(ModelCatalog::builtin()),
        }
    }
}

/// Build the application router over the given state
pub fn create_router(state: ServerState, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::api_routes())
        .nest_service("/audio", ServeDir::new(&config.generation.output_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The HTTP server
pub struct AppServer {
    config: ServerConfig,
}

impl AppServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Bind and serve until the process exits
    pub async fn run(self) -> Result<()> {
        std::fs::create_dir_all(&self.config.generation.output_dir).map_err(|e| TtsError::Io {
            message: format!("cannot create output directory: {e}"),
            path: Some(self.config.generation.output_dir.clone()),
        })?;

        let state = ServerState::new(&self.config);
        state.coordinator.spawn_retention_sweeper();

        let app = create_router(state, &self.config);
        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TtsError::Io {
                message: format!("cannot bind {addr}: {e}"),
                path: None,
            })?;

        info!(%addr, version = crate::VERSION, "bookvoice server listening");
        axum::serve(listener, app).await.map_err(|e| TtsError::Io {
            message: format!("server error: {e}"),
            path: None,
        })
    }
}
