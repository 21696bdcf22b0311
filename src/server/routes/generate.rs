//! Job submission endpoint
//!
//! Validation here is minimal on purpose: only text that is empty after
//! trimming is rejected up front. Model identifiers are accepted as-is
//! (the catalog is advisory) and resolve, or fail, inside the background
//! task where the error lands on the task record.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::server::ServerState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
    pub model_id: String,
    #[serde(default)]
    pub language: Option<String>,
}

pub async fn generate(
    State(state): State<ServerState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if request.text.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Unsupported input: text is empty" })),
        ));
    }

    let task_id = state
        .coordinator
        .launch(request.text, request.model_id, request.language);

    Ok(Json(json!({ "task_id": task_id })))
}
