//! Route handlers

pub mod generate;
pub mod health;
pub mod models;
pub mod progress;

use axum::routing::{get, post};
use axum::Router;

use crate::server::ServerState;

/// API route table
pub fn api_routes() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/models", get(models::list_models))
        .route("/api/generate", post(generate::generate))
        .route("/api/progress/:task_id", get(progress::progress))
}
