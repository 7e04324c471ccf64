//! Chat endpoint.
//!
//! - `POST /api/chat` (alias `POST /chat`): `{message, conversationHistory?}`
//!
//! Every failure, including a malformed body, answers with
//! `{"error": ..., "success": false}`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tickertalk_agent::ChatRuntime;
use tickertalk_core::{ChatResponse, ConversationTurn, InterfaceError};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

const MESSAGE_REQUIRED: &str = "Message is required";
const INVALID_HISTORY: &str = "conversationHistory must be a list of {role, content} messages";

#[derive(Clone)]
pub struct ChatState {
    runtime: ChatRuntime,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatErrorBody {
    pub error: String,
    pub success: bool,
}

type ChatRejection = (StatusCode, Json<ChatErrorBody>);

pub fn router(runtime: ChatRuntime) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/chat", post(chat))
        .with_state(ChatState { runtime })
}

pub async fn chat(
    State(state): State<ChatState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, ChatRejection> {
    let correlation_id = Uuid::new_v4();
    let span = info_span!("chat_request", correlation_id = %correlation_id);

    async move {
        let body = match payload {
            Ok(Json(body)) => body,
            Err(rejection) => {
                warn!(
                    event_name = "server.chat.body_rejected",
                    reason = %rejection.body_text(),
                    "request body is not a JSON document"
                );
                return Err(reject(StatusCode::BAD_REQUEST, MESSAGE_REQUIRED));
            }
        };

        let message = body.get("message").and_then(Value::as_str).unwrap_or_default();
        if message.trim().is_empty() {
            warn!(event_name = "server.chat.message_missing", "message is missing or blank");
            return Err(reject(StatusCode::BAD_REQUEST, MESSAGE_REQUIRED));
        }
        let history = parse_history(&body)?;

        info!(
            event_name = "server.chat.received",
            message_chars = message.chars().count(),
            history_turns = history.len(),
            "chat request received"
        );

        match state.runtime.handle_message(message, history).await {
            Ok(response) => Ok(Json(response)),
            Err(error) => {
                let mapped = error.into_interface();
                warn!(
                    event_name = "server.chat.failed",
                    status = mapped.status,
                    rule = mapped.rule,
                    "chat request failed"
                );
                Err(failure(&mapped))
            }
        }
    }
    .instrument(span)
    .await
}

fn parse_history(body: &Value) -> Result<Vec<ConversationTurn>, ChatRejection> {
    match body.get("conversationHistory") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(raw) => {
            serde_json::from_value::<Vec<ConversationTurn>>(raw.clone()).map_err(|error| {
                warn!(
                    event_name = "server.chat.history_rejected",
                    error = %error,
                    "conversation history is malformed"
                );
                reject(StatusCode::BAD_REQUEST, INVALID_HISTORY)
            })
        }
    }
}

fn failure(error: &InterfaceError) -> ChatRejection {
    let status = StatusCode::from_u16(error.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    reject(status, error.user_message())
}

fn reject(status: StatusCode, message: &str) -> ChatRejection {
    (status, Json(ChatErrorBody { error: message.to_string(), success: false }))
}
