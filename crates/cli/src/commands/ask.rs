use std::sync::Arc;

use serde::Serialize;
use tickertalk_agent::{ChatRuntime, HttpCompletionClient, MarketDataClient, YahooChartClient};
use tickertalk_core::config::{AppConfig, LoadOptions, LogFormat};
use tickertalk_core::Quote;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AskReport {
    command: &'static str,
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stock_data: Option<Quote>,
}

pub fn run(message: &str, no_market_data: bool) -> CommandResult {
    let mut config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("ask", "config_validation", error.to_string(), 2)
        }
    };
    if no_market_data {
        config.market_data.enabled = false;
    }
    init_logging(&config);

    let runtime = match build_runtime(&config) {
        Ok(runtime) => runtime,
        Err(message) => return CommandResult::failure("ask", "client_setup", message, 3),
    };

    let executor = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(executor) => executor,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                4,
            )
        }
    };

    match executor.block_on(runtime.handle_message(message, Vec::new())) {
        Ok(response) => CommandResult::report(&AskReport {
            command: "ask",
            status: "ok",
            message: response.message,
            stock_data: response.stock_data,
        }),
        Err(error) => {
            let mapped = error.into_interface();
            CommandResult::failure("ask", mapped.rule, mapped.message, 5)
        }
    }
}

fn build_runtime(config: &AppConfig) -> Result<ChatRuntime, String> {
    let completion = HttpCompletionClient::from_config(&config.llm).map_err(|e| e.to_string())?;
    let market_data: Option<Arc<dyn MarketDataClient>> = if config.market_data.enabled {
        let client = YahooChartClient::from_config(&config.market_data).map_err(|e| e.to_string())?;
        Some(Arc::new(client))
    } else {
        None
    };
    Ok(ChatRuntime::new(Arc::new(completion), market_data))
}

/// Logs go to stderr so stdout stays a single JSON document.
fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::WARN);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
