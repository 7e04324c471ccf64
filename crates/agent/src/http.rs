use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

pub const USER_AGENT: &str = concat!("tickertalk/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("llm.api_key is not configured")]
    MissingApiKey,
    #[error("http client could not be constructed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Every outbound call gets its own total-request timeout; there is no retry layer.
pub fn build_http_client(timeout: Duration) -> Result<Client, ClientBuildError> {
    Ok(Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?)
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::join_url;

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(
            join_url("https://api.groq.com/openai/v1/", "/chat/completions"),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(
            join_url("http://127.0.0.1:9", "v8/finance/chart/AAPL"),
            "http://127.0.0.1:9/v8/finance/chart/AAPL"
        );
    }
}
