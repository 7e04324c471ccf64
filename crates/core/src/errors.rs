use thiserror::Error;

pub const INVALID_CREDENTIALS_MESSAGE: &str =
    "Invalid API key. Please check the completion provider API key (TICKERTALK_LLM_API_KEY).";
pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please try again later";
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request to AI service";
pub const MODEL_NOT_FOUND_MESSAGE: &str = "AI model not found. Please check the model name.";
pub const NETWORK_MESSAGE: &str = "Network error. Please check your internet connection";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to get response from AI";

/// Failure of the completion backend call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompletionError {
    #[error("completion provider returned HTTP {status}")]
    Upstream { status: u16, detail: Option<String> },
    #[error("could not reach completion provider: {0}")]
    Network(String),
    #[error("completion transport failure: {0}")]
    Transport(String),
    #[error("completion response could not be decoded: {0}")]
    Decode(String),
    #[error("No response from AI")]
    EmptyContent,
}

impl CompletionError {
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn upstream_detail(&self) -> Option<&str> {
        match self {
            Self::Upstream { detail: Some(detail), .. } if !detail.trim().is_empty() => {
                Some(detail.as_str())
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// Status code and user-safe message returned to the caller.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{status}: {message}")]
pub struct InterfaceError {
    pub status: u16,
    pub message: String,
    pub rule: &'static str,
}

impl InterfaceError {
    pub fn user_message(&self) -> &str {
        &self.message
    }
}

impl ChatError {
    pub fn into_interface(self) -> InterfaceError {
        match self {
            Self::Validation(message) => {
                InterfaceError { status: 400, message, rule: "validation" }
            }
            Self::Completion(error) => ErrorMapper::default().map(&error),
        }
    }
}

enum RuleMessage {
    Fixed(&'static str),
    DetailOr(&'static str),
    Detail,
}

pub struct ErrorRule {
    pub name: &'static str,
    matches: fn(&CompletionError) -> bool,
    status: u16,
    message: RuleMessage,
}

impl ErrorRule {
    fn render(&self, error: &CompletionError) -> String {
        match self.message {
            RuleMessage::Fixed(message) => message.to_string(),
            RuleMessage::DetailOr(fallback) => {
                error.upstream_detail().unwrap_or(fallback).to_string()
            }
            RuleMessage::Detail => {
                error.upstream_detail().unwrap_or(GENERIC_FAILURE_MESSAGE).to_string()
            }
        }
    }
}

fn is_unauthorized(error: &CompletionError) -> bool {
    error.upstream_status() == Some(401)
}

fn is_rate_limited(error: &CompletionError) -> bool {
    error.upstream_status() == Some(429)
}

fn is_bad_request(error: &CompletionError) -> bool {
    error.upstream_status() == Some(400)
}

fn is_not_found(error: &CompletionError) -> bool {
    error.upstream_status() == Some(404)
}

fn is_network(error: &CompletionError) -> bool {
    matches!(error, CompletionError::Network(_))
}

fn has_upstream_detail(error: &CompletionError) -> bool {
    error.upstream_detail().is_some()
}

fn always(_: &CompletionError) -> bool {
    true
}

const COMPLETION_RULES: &[ErrorRule] = &[
    ErrorRule {
        name: "invalid_credentials",
        matches: is_unauthorized,
        status: 401,
        message: RuleMessage::Fixed(INVALID_CREDENTIALS_MESSAGE),
    },
    ErrorRule {
        name: "rate_limited",
        matches: is_rate_limited,
        status: 429,
        message: RuleMessage::Fixed(RATE_LIMITED_MESSAGE),
    },
    ErrorRule {
        name: "invalid_request",
        matches: is_bad_request,
        status: 400,
        message: RuleMessage::DetailOr(INVALID_REQUEST_MESSAGE),
    },
    ErrorRule {
        name: "model_not_found",
        matches: is_not_found,
        status: 404,
        message: RuleMessage::Fixed(MODEL_NOT_FOUND_MESSAGE),
    },
    ErrorRule {
        name: "network",
        matches: is_network,
        status: 503,
        message: RuleMessage::Fixed(NETWORK_MESSAGE),
    },
    ErrorRule {
        name: "upstream_detail",
        matches: has_upstream_detail,
        status: 500,
        message: RuleMessage::Detail,
    },
];

const FALLBACK_RULE: ErrorRule = ErrorRule {
    name: "generic",
    matches: always,
    status: 500,
    message: RuleMessage::Fixed(GENERIC_FAILURE_MESSAGE),
};

/// Maps completion failures to caller-facing errors. Rules are evaluated top to
/// bottom and the first match wins; nothing falls through unmatched.
#[derive(Clone, Copy)]
pub struct ErrorMapper {
    rules: &'static [ErrorRule],
}

impl Default for ErrorMapper {
    fn default() -> Self {
        Self { rules: COMPLETION_RULES }
    }
}

impl ErrorMapper {
    pub fn rules(&self) -> &'static [ErrorRule] {
        self.rules
    }

    pub fn map(&self, error: &CompletionError) -> InterfaceError {
        let rule = self.rules.iter().find(|rule| (rule.matches)(error)).unwrap_or(&FALLBACK_RULE);
        InterfaceError { status: rule.status, message: rule.render(error), rule: rule.name }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ChatError, CompletionError, ErrorMapper, GENERIC_FAILURE_MESSAGE,
        INVALID_CREDENTIALS_MESSAGE, INVALID_REQUEST_MESSAGE, MODEL_NOT_FOUND_MESSAGE,
        NETWORK_MESSAGE, RATE_LIMITED_MESSAGE,
    };

    fn upstream(status: u16, detail: Option<&str>) -> CompletionError {
        CompletionError::Upstream { status, detail: detail.map(str::to_string) }
    }

    #[test]
    fn rules_are_ordered_by_precedence() {
        let names = ErrorMapper::default().rules().iter().map(|rule| rule.name).collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                "invalid_credentials",
                "rate_limited",
                "invalid_request",
                "model_not_found",
                "network",
                "upstream_detail"
            ]
        );
    }

    #[test]
    fn unauthorized_maps_to_credentials_message_even_with_detail() {
        let mapped = ErrorMapper::default().map(&upstream(401, Some("Invalid API Key")));
        assert_eq!(mapped.status, 401);
        assert_eq!(mapped.user_message(), INVALID_CREDENTIALS_MESSAGE);
    }

    #[test]
    fn rate_limit_maps_to_429() {
        let mapped = ErrorMapper::default().map(&upstream(429, None));
        assert_eq!(mapped.status, 429);
        assert_eq!(mapped.message, RATE_LIMITED_MESSAGE);
        assert_eq!(mapped.rule, "rate_limited");
    }

    #[test]
    fn bad_request_prefers_upstream_detail() {
        let mapper = ErrorMapper::default();

        let with_detail = mapper.map(&upstream(400, Some("'messages' must not be empty")));
        assert_eq!(with_detail.status, 400);
        assert_eq!(with_detail.message, "'messages' must not be empty");

        let without_detail = mapper.map(&upstream(400, Some("   ")));
        assert_eq!(without_detail.status, 400);
        assert_eq!(without_detail.message, INVALID_REQUEST_MESSAGE);
    }

    #[test]
    fn not_found_maps_to_model_message() {
        let mapped = ErrorMapper::default().map(&upstream(404, Some("model does not exist")));
        assert_eq!(mapped.status, 404);
        assert_eq!(mapped.message, MODEL_NOT_FOUND_MESSAGE);
    }

    #[test]
    fn connection_failures_map_to_503() {
        let mapped = ErrorMapper::default()
            .map(&CompletionError::Network("dns error: failed to lookup address".to_string()));
        assert_eq!(mapped.status, 503);
        assert_eq!(mapped.message, NETWORK_MESSAGE);
    }

    #[test]
    fn other_upstream_detail_is_surfaced_as_500() {
        let mapped = ErrorMapper::default().map(&upstream(503, Some("model overloaded")));
        assert_eq!(mapped.status, 500);
        assert_eq!(mapped.message, "model overloaded");
    }

    #[test]
    fn everything_else_is_generic_500() {
        let mapper = ErrorMapper::default();
        for error in [
            CompletionError::EmptyContent,
            CompletionError::Transport("operation timed out".to_string()),
            CompletionError::Decode("expected value".to_string()),
            upstream(502, None),
        ] {
            let mapped = mapper.map(&error);
            assert_eq!(mapped.status, 500);
            assert_eq!(mapped.message, GENERIC_FAILURE_MESSAGE);
            assert_eq!(mapped.rule, "generic");
        }
    }

    #[test]
    fn validation_errors_map_to_400() {
        let mapped = ChatError::Validation("Message is required".to_string()).into_interface();
        assert_eq!(mapped.status, 400);
        assert_eq!(mapped.message, "Message is required");
    }
}
