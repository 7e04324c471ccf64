use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tickertalk_core::config::LlmConfig;
use tickertalk_core::{CompletionError, ConversationTurn};
use tracing::{debug, warn};

use crate::http::{build_http_client, join_url, ClientBuildError};

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, turns: &[ConversationTurn]) -> Result<String, CompletionError>;
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationTurn],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: Option<ChatCompletionMessage>,
}

#[derive(Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ProviderErrorEnvelope {
    error: Option<ProviderErrorBody>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client with bearer authentication.
#[derive(Clone)]
pub struct HttpCompletionClient {
    client: Client,
    endpoint: String,
    api_key: SecretString,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl HttpCompletionClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, ClientBuildError> {
        let api_key = config.api_key.clone().ok_or(ClientBuildError::MissingApiKey)?;
        let client = build_http_client(Duration::from_secs(config.timeout_secs))?;

        Ok(Self {
            client,
            endpoint: join_url(&config.base_url, "chat/completions"),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, turns: &[ConversationTurn]) -> Result<String, CompletionError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: turns,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            event_name = "agent.completion.request",
            model = %self.model,
            turns = turns.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = provider_error_detail(&body);
            warn!(
                event_name = "agent.completion.upstream_error",
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or("<none>"),
                "completion provider returned an error status"
            );
            return Err(CompletionError::Upstream { status: status.as_u16(), detail });
        }

        let payload = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|error| CompletionError::Decode(error.to_string()))?;

        first_choice_content(payload).ok_or(CompletionError::EmptyContent)
    }
}

fn first_choice_content(payload: ChatCompletionResponse) -> Option<String> {
    payload
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
}

fn provider_error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ProviderErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .filter(|message| !message.trim().is_empty())
}

/// DNS and connection-refused failures are connect errors in reqwest; they are
/// the only transport failures reported as network problems.
fn classify_transport_error(error: reqwest::Error) -> CompletionError {
    warn!(
        event_name = "agent.completion.transport_error",
        connect = error.is_connect(),
        timeout = error.is_timeout(),
        error = %error,
        "completion request failed before a response was received"
    );
    if error.is_connect() {
        CompletionError::Network(error.to_string())
    } else {
        CompletionError::Transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use tickertalk_core::ConversationTurn;

    use super::{
        first_choice_content, provider_error_detail, ChatCompletionRequest,
        ChatCompletionResponse,
    };

    fn parse(json: &str) -> ChatCompletionResponse {
        serde_json::from_str(json).expect("valid completion payload")
    }

    #[test]
    fn request_body_has_openai_shape() {
        let turns = vec![ConversationTurn::system("persona"), ConversationTurn::user("hi")];
        let body = serde_json::to_value(ChatCompletionRequest {
            model: "llama-3.1-8b-instant",
            messages: &turns,
            temperature: 0.7,
            max_tokens: 500,
        })
        .expect("serialize");

        assert_eq!(body["model"], "llama-3.1-8b-instant");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert!((body["temperature"].as_f64().unwrap_or_default() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn first_choice_content_is_extracted() {
        let payload = parse(
            r#"{"choices":[{"message":{"role":"assistant","content":"EPS is earnings per share."}},{"message":{"content":"second"}}]}"#,
        );
        assert_eq!(first_choice_content(payload).as_deref(), Some("EPS is earnings per share."));
    }

    #[test]
    fn missing_or_blank_content_yields_none() {
        assert_eq!(first_choice_content(parse(r#"{"choices":[]}"#)), None);
        assert_eq!(first_choice_content(parse(r#"{}"#)), None);
        assert_eq!(first_choice_content(parse(r#"{"choices":[{"message":null}]}"#)), None);
        assert_eq!(
            first_choice_content(parse(r#"{"choices":[{"message":{"content":""}}]}"#)),
            None
        );
    }

    #[test]
    fn provider_error_detail_reads_nested_message() {
        assert_eq!(
            provider_error_detail(
                r#"{"error":{"message":"model_decommissioned","type":"invalid_request_error"}}"#
            )
            .as_deref(),
            Some("model_decommissioned")
        );
        assert_eq!(provider_error_detail("<html>bad gateway</html>"), None);
        assert_eq!(provider_error_detail(r#"{"error":{}}"#), None);
    }
}
