//! Chat endpoint (`POST /ask`).

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use folio_agent::ChatOutcome;
use folio_core::ChatMessage;

use crate::server::GatewayState;

/// Set on non-answer replies: `degraded` or `failed`.
pub const OUTCOME_HEADER: &str = "x-folio-outcome";

/// Body of the 500 returned when the chat task itself dies.
pub const ASK_FAILURE: &str =
    "Sorry, I'm experiencing technical difficulties. Please try again later.";

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Handler for `POST /ask`.
///
/// The turn runs on its own task so a panic anywhere inside it is reported
/// as a JSON error instead of dropping the connection.
pub async fn ask(State(state): State<GatewayState>, Json(payload): Json<AskRequest>) -> Response {
    let agent = state.agent.clone();
    let task = tokio::spawn(async move { agent.chat(&payload.message, payload.history).await });

    match task.await {
        Ok(outcome) => render(outcome),
        Err(e) => {
            error!(error = %e, "Chat task aborted");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": ASK_FAILURE })),
            )
                .into_response()
        }
    }
}

fn render(outcome: ChatOutcome) -> Response {
    let mut response = outcome.reply().to_string().into_response();
    if !outcome.is_answer() {
        response
            .headers_mut()
            .insert(OUTCOME_HEADER, HeaderValue::from_static(outcome.kind()));
    }
    response
}
