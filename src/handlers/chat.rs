//! Chat endpoint
//!
//! `POST /api/chat` runs behind the admission guard. An exact catalog match is
//! answered locally; anything else goes to the completion gateway with the
//! ranked shortlist as context. New browsers get a session cookie on success.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::catalog::{find_exact, shortlist};
use crate::error::{ChatServerError, RequestError};
use crate::middleware::logging::{log_gateway_reply, log_local_reply};
use crate::server::AppState;
use crate::utils::{ClientAddr, normalize_message};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Extension(client): Extension<ClientAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ChatServerError> {
    let request: ChatRequest = serde_json::from_slice(&body)
        .map_err(|e| RequestError::MalformedBody(e.to_string()))?;
    let message = normalize_message(&request.message, state.config.server.max_message_chars)?;

    let reply = answer(&state, &client, &message).await;

    let mut response = Json(ChatReply { reply }).into_response();
    state.sessions.stamp(&headers, &client, &mut response);
    Ok(response)
}

/// Produce the reply text for an already validated message
pub async fn answer(state: &AppState, client: &ClientAddr, message: &str) -> String {
    if let Some(product) = find_exact(&state.catalog, message) {
        log_local_reply(client, &product.name);
        return product.info_line();
    }

    let completion = &state.config.completion;
    let context = shortlist(&state.catalog, message, completion.shortlist_size);
    let result = state
        .gateway
        .complete(&completion.system_prompt, message, &context)
        .await;
    log_gateway_reply(client, context.len(), result.is_success());

    result.into_reply()
}
