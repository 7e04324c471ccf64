use std::sync::Arc;

use tickertalk_agent::{
    ChatRuntime, ClientBuildError, HttpCompletionClient, MarketDataClient, YahooChartClient,
};
use tickertalk_core::config::{AppConfig, ConfigError};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub runtime: ChatRuntime,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("outbound client setup failed: {0}")]
    Client(#[from] ClientBuildError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        model = %config.llm.model,
        "starting application bootstrap"
    );

    let completion = HttpCompletionClient::from_config(&config.llm)?;
    let market_data: Option<Arc<dyn MarketDataClient>> = if config.market_data.enabled {
        Some(Arc::new(YahooChartClient::from_config(&config.market_data)?))
    } else {
        None
    };

    info!(
        event_name = "system.bootstrap.clients_ready",
        correlation_id = "bootstrap",
        completion_base_url = %config.llm.base_url,
        market_data_enabled = market_data.is_some(),
        "outbound clients constructed"
    );

    let runtime = ChatRuntime::new(Arc::new(completion), market_data);
    Ok(Application { config, runtime })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tickertalk_core::config::{AppConfig, ConfigOverrides, LoadOptions};

    use super::{bootstrap_with_config, BootstrapError};

    fn config_with_key() -> AppConfig {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("gsk-test".to_string().into());
        config
    }

    #[test]
    fn bootstrap_fails_fast_without_completion_key() {
        let result = bootstrap_with_config(AppConfig::default());

        assert!(matches!(result, Err(BootstrapError::Client(_))));
        let message = result.err().map(|error| error.to_string()).unwrap_or_default();
        assert!(message.contains("llm.api_key"));
    }

    #[test]
    fn bootstrap_wires_market_data_when_enabled() {
        let application = bootstrap_with_config(config_with_key()).expect("bootstrap");

        assert!(application.runtime.enrichment_enabled());
        assert_eq!(application.config.llm.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn disabled_market_data_builds_a_plain_runtime() {
        let mut config = config_with_key();
        config.market_data.enabled = false;

        let application = bootstrap_with_config(config).expect("bootstrap");

        assert!(!application.runtime.enrichment_enabled());
    }

    #[test]
    fn bootstrap_loads_layered_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "[llm]\napi_key = \"gsk-from-file\"\n\n[market_data]\nenabled = false\n\n[server]\nport = 4100"
        )
        .expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides { server_port: Some(4200), ..ConfigOverrides::default() },
        })
        .expect("layered config");
        let application = bootstrap_with_config(config).expect("bootstrap from file");

        assert!(!application.runtime.enrichment_enabled());
        assert_eq!(application.config.server.port, 4200);
    }
}
