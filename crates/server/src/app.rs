use std::path::Path;

use axum::Router;
use tickertalk_agent::ChatRuntime;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::{chat, health};

/// Chat and health routes, plus the chat widget when a static directory is configured.
pub fn router(runtime: ChatRuntime, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new().merge(health::router()).merge(chat::router(runtime));

    if let Some(dir) = static_dir {
        info!(
            event_name = "system.server.static_dir",
            correlation_id = "bootstrap",
            static_dir = %dir.display(),
            "serving static assets"
        );
        router = router.fallback_service(ServeDir::new(dir));
    }

    router.layer(CorsLayer::permissive()).layer(TraceLayer::new_for_http())
}
