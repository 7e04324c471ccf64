use axum::{routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Liveness only; upstream providers are not probed.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/api/health", get(health)).route("/health", get(health))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use chrono::DateTime;

    use crate::health::health;

    #[tokio::test]
    async fn health_reports_ok_with_parseable_timestamp() {
        let Json(payload) = health().await;

        assert_eq!(payload.status, "ok");
        assert!(payload.timestamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&payload.timestamp).is_ok());
    }
}
