//! HTTP server
//!
//! Axum front end over the generation pipeline: job submission, SSE
//! progress, model listing, and static serving of finished audio.

pub mod config;
pub mod routes;
mod server_core;

pub use config::ServerConfig;
pub use server_core::{create_router, AppServer, ServerState};
