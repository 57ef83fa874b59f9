//! Landing and health endpoints.
//!
//! `/health` performs a live model round trip and fails hard, unlike `/ask`,
//! so uptime monitors see a broken backend.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{error, info};

use folio_core::{ChatMessage, CompletionRequest, ErrorClass};

use crate::server::GatewayState;

pub const HEALTH_PROMPT: &str = "Hello, how are you?";

/// Handler for `GET /`
pub async fn home(State(state): State<GatewayState>) -> Json<Value> {
    Json(json!({
        "message": format!("Nothing to see here, please visit {}", state.profile_url),
    }))
}

/// Handler for `GET /health`
pub async fn health(
    State(state): State<GatewayState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let request = CompletionRequest {
        messages: vec![ChatMessage::user(HEALTH_PROMPT)],
        tools: Vec::new(),
    };

    match state.model.complete(&request).await {
        Ok(completion) => {
            info!(model = state.model.name(), "Health probe succeeded");
            Ok(Json(json!({ "message": completion.message.text() })))
        }
        Err(e) => {
            error!(class = ?ErrorClass::of(&e), error = %e, "Health probe failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            ))
        }
    }
}
