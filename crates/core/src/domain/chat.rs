use serde::Serialize;

use crate::domain::conversation::ConversationTurn;
use crate::domain::quote::Quote;
use crate::errors::ChatError;

/// Validated inbound chat turn. `message` is trimmed and never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatRequest {
    message: String,
    history: Vec<ConversationTurn>,
}

impl ChatRequest {
    pub fn new(message: &str, history: Vec<ConversationTurn>) -> Result<Self, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::Validation("Message is required".to_string()));
        }
        Ok(Self { message: message.to_string(), history })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_data: Option<Quote>,
}

impl ChatResponse {
    pub fn answered(message: String, stock_data: Option<Quote>) -> Self {
        Self { message, success: true, stock_data }
    }
}
