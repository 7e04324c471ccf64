//! Quote lookup against a Yahoo-style v8 chart endpoint.
//!
//! Lookups never fail the caller: transport errors, non-2xx statuses and
//! malformed payloads are logged and collapse to `None`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tickertalk_core::config::MarketDataConfig;
use tickertalk_core::{Quote, TickerSymbol};
use tracing::{debug, warn};

use crate::http::{build_http_client, join_url, ClientBuildError};

#[async_trait]
pub trait MarketDataClient: Send + Sync {
    async fn fetch_quote(&self, symbol: &TickerSymbol) -> Option<Quote>;
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartEnvelope {
    pub chart: Option<Chart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartResult {
    pub meta: Option<ChartMeta>,
    pub indicators: Option<ChartIndicators>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: Option<String>,
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub chart_previous_close: Option<f64>,
    pub currency: Option<String>,
    pub market_state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartIndicators {
    pub quote: Option<Vec<IndicatorSeries>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IndicatorSeries {
    pub close: Option<Vec<Option<f64>>>,
}

#[derive(Clone)]
pub struct YahooChartClient {
    client: Client,
    base_url: String,
}

impl YahooChartClient {
    pub fn from_config(config: &MarketDataConfig) -> Result<Self, ClientBuildError> {
        Ok(Self {
            client: build_http_client(Duration::from_secs(config.timeout_secs))?,
            base_url: config.base_url.clone(),
        })
    }

    fn chart_url(&self, symbol: &TickerSymbol) -> String {
        join_url(&self.base_url, &format!("v8/finance/chart/{symbol}"))
    }

    async fn fetch_chart(&self, symbol: &TickerSymbol) -> Result<ChartEnvelope, reqwest::Error> {
        self.client
            .get(self.chart_url(symbol))
            .query(&[("interval", "1d"), ("range", "1d")])
            .send()
            .await?
            .error_for_status()?
            .json::<ChartEnvelope>()
            .await
    }
}

#[async_trait]
impl MarketDataClient for YahooChartClient {
    async fn fetch_quote(&self, symbol: &TickerSymbol) -> Option<Quote> {
        let envelope = match self.fetch_chart(symbol).await {
            Ok(envelope) => envelope,
            Err(error) => {
                warn!(
                    event_name = "agent.market_data.fetch_failed",
                    symbol = %symbol,
                    status = error.status().map(|status| status.as_u16()),
                    timeout = error.is_timeout(),
                    error = %error,
                    "quote lookup failed; continuing without real-time data"
                );
                return None;
            }
        };

        let quote = normalize_chart(symbol, envelope);
        match &quote {
            Some(quote) => debug!(
                event_name = "agent.market_data.quote_parsed",
                symbol = %quote.symbol,
                price = %quote.price,
                previous_close = %quote.previous_close,
                "quote normalized"
            ),
            None => warn!(
                event_name = "agent.market_data.empty_chart",
                symbol = %symbol,
                "quote provider returned no usable price"
            ),
        }
        quote
    }
}

/// Turns a chart payload into a [`Quote`]; `None` when there is no result set,
/// no current price, or the derived change does not fit a `Decimal`.
pub fn normalize_chart(requested: &TickerSymbol, envelope: ChartEnvelope) -> Option<Quote> {
    let result = envelope.chart?.result?.into_iter().next()?;
    let meta = result.meta?;
    let price = meta.regular_market_price?;

    let previous_close = meta
        .previous_close
        .filter(|value| is_usable(*value))
        .or_else(|| meta.chart_previous_close.filter(|value| is_usable(*value)))
        .or_else(|| second_to_last_close(result.indicators.as_ref()))
        .unwrap_or(price);

    let price = Decimal::try_from(price).ok()?;
    let previous_close = Decimal::try_from(previous_close).unwrap_or(price);
    let symbol =
        meta.symbol.filter(|value| !value.trim().is_empty()).unwrap_or_else(|| requested.0.clone());

    Quote::new(symbol, price, previous_close, meta.currency, meta.market_state)
}

fn is_usable(value: f64) -> bool {
    value.is_finite() && value != 0.0
}

fn second_to_last_close(indicators: Option<&ChartIndicators>) -> Option<f64> {
    let closes = indicators?.quote.as_ref()?.first()?.close.as_ref()?;
    let index = closes.len().checked_sub(2)?;
    closes[index].filter(|value| is_usable(*value))
}
