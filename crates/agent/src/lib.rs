//! Agent runtime for tickertalk.
//!
//! Owns the two outbound integrations and the orchestration around them:
//! - `llm`: OpenAI-compatible chat completion client (fatal on failure)
//! - `market_data`: chart-based quote lookup (absorbs its own failures)
//! - `runtime`: `ChatRuntime`, which runs intent extraction, enrichment,
//!   prompt composition, completion and reply assembly for one request
//!
//! The completion model only writes narrative text. Prices shown to the user
//! always come from the quote provider, never from the model.

pub mod http;
pub mod llm;
pub mod market_data;
pub mod runtime;

pub use http::ClientBuildError;
pub use llm::{CompletionClient, HttpCompletionClient};
pub use market_data::{MarketDataClient, YahooChartClient};
pub use runtime::ChatRuntime;
