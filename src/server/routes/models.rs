//! Model catalog endpoint

use axum::extract::State;
use axum::Json;

use crate::engine::CatalogEntry;
use crate::server::ServerState;

/// List the advertised models as a bare array. The catalog is advisory:
/// generation accepts any hub identifier, listed or not.
pub async fn list_models(State(state): State<ServerState>) -> Json<Vec<CatalogEntry>> {
    Json(state.catalog.entries().to_vec())
}
