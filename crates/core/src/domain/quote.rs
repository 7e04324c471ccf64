use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_MARKET_STATE: &str = "CLOSED";

/// Ticker symbol extracted from user text or resolved from the company table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TickerSymbol(pub String);

impl TickerSymbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Point-in-time price snapshot for one symbol.
///
/// All decimal fields are rounded half away from zero to two places at
/// construction. `change` and `change_percent` are derived from the unrounded
/// price and previous close.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quote {
    pub symbol: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub currency: String,
    pub market_state: String,
    pub previous_close: Decimal,
}

impl Quote {
    /// `None` when the change or its percentage overflows `Decimal`.
    pub fn new(
        symbol: impl Into<String>,
        price: Decimal,
        previous_close: Decimal,
        currency: Option<String>,
        market_state: Option<String>,
    ) -> Option<Self> {
        let change = price.checked_sub(previous_close)?;
        let change_percent = if previous_close.is_zero() || previous_close == price {
            Decimal::ZERO
        } else {
            change.checked_div(previous_close)?.checked_mul(Decimal::ONE_HUNDRED)?
        };

        Some(Self {
            symbol: symbol.into(),
            price: round_cents(price),
            change: round_cents(change),
            change_percent: round_cents(change_percent),
            currency: non_blank(currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            market_state: non_blank(market_state)
                .unwrap_or_else(|| DEFAULT_MARKET_STATE.to_string()),
            previous_close: round_cents(previous_close),
        })
    }

    pub fn price_display(&self) -> String {
        format!("{:.2}", self.price)
    }

    pub fn previous_close_display(&self) -> String {
        format!("{:.2}", self.previous_close)
    }

    /// Signed change, e.g. `+50.00` or `-3.25`.
    pub fn change_display(&self) -> String {
        signed(self.change)
    }

    /// Signed percentage change, e.g. `+50.00%`.
    pub fn change_percent_display(&self) -> String {
        format!("{}%", signed(self.change_percent))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuotePayload<'a> {
    symbol: &'a str,
    price: String,
    change: String,
    change_percent: String,
    currency: &'a str,
    market_state: &'a str,
    previous_close: String,
}

impl Serialize for Quote {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        QuotePayload {
            symbol: &self.symbol,
            price: self.price_display(),
            change: self.change_display(),
            change_percent: self.change_percent_display(),
            currency: &self.currency,
            market_state: &self.market_state,
            previous_close: self.previous_close_display(),
        }
        .serialize(serializer)
    }
}

fn round_cents(value: Decimal) -> Decimal {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // keep "-0.00" out of rendered output
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

fn signed(value: Decimal) -> String {
    if value >= Decimal::ZERO {
        format!("+{value:.2}")
    } else {
        format!("{value:.2}")
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::Quote;

    fn dec(units: i64, scale: u32) -> Decimal {
        Decimal::new(units, scale)
    }

    #[test]
    fn positive_move_gets_plus_sign_and_percentage() {
        let quote = Quote::new("AAPL", dec(15000, 2), dec(10000, 2), None, None).expect("quote");

        assert_eq!(quote.change_display(), "+50.00");
        assert_eq!(quote.change_percent_display(), "+50.00%");
        assert_eq!(quote.price_display(), "150.00");
        assert_eq!(quote.previous_close_display(), "100.00");
    }

    #[test]
    fn negative_move_keeps_minus_sign() {
        let quote = Quote::new("MSFT", dec(9750, 2), dec(10000, 2), None, None).expect("quote");

        assert_eq!(quote.change_display(), "-2.50");
        assert_eq!(quote.change_percent_display(), "-2.50%");
    }

    #[test]
    fn unchanged_or_zero_previous_close_reports_flat_percentage() {
        let flat = Quote::new("TSLA", dec(200, 0), dec(200, 0), None, None).expect("quote");
        assert_eq!(flat.change_percent_display(), "+0.00%");
        assert_eq!(flat.change_display(), "+0.00");

        let no_reference =
            Quote::new("TSLA", dec(200, 0), Decimal::ZERO, None, None).expect("quote");
        assert_eq!(no_reference.change_percent_display(), "+0.00%");
    }

    #[test]
    fn missing_currency_and_market_state_use_defaults() {
        let quote = Quote::new("INFY", dec(1, 0), dec(1, 0), Some("  ".to_string()), None)
            .expect("quote");

        assert_eq!(quote.currency, "USD");
        assert_eq!(quote.market_state, "CLOSED");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let quote = Quote::new("GOOGL", dec(100_005, 3), dec(100, 0), None, None).expect("quote");

        assert_eq!(quote.price_display(), "100.01");
        assert_eq!(quote.change_display(), "+0.01");
    }

    #[test]
    fn overflowing_change_yields_none() {
        assert!(Quote::new("BIG", Decimal::MAX, dec(1, 3), None, None).is_none());
        assert!(Quote::new("BIG", Decimal::MIN, Decimal::MAX, None, None).is_none());
    }

    #[test]
    fn serializes_display_strings_in_camel_case() {
        let quote = Quote::new(
            "AAPL",
            dec(15000, 2),
            dec(10000, 2),
            Some("USD".to_string()),
            Some("REGULAR".to_string()),
        )
        .expect("quote");

        let value = serde_json::to_value(&quote).expect("serialize quote");

        assert_eq!(value["symbol"], "AAPL");
        assert_eq!(value["price"], "150.00");
        assert_eq!(value["change"], "+50.00");
        assert_eq!(value["changePercent"], "+50.00%");
        assert_eq!(value["previousClose"], "100.00");
        assert_eq!(value["marketState"], "REGULAR");
    }
}
