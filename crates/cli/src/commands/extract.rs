use serde::Serialize;
use tickertalk_core::{IntentExtractor, MatchSource, TickerSymbol};

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct ExtractReport<'a> {
    command: &'static str,
    status: &'static str,
    text: &'a str,
    symbol: Option<TickerSymbol>,
    source: Option<MatchSource>,
}

pub fn run(text: &str) -> CommandResult {
    if text.trim().is_empty() {
        return CommandResult::failure("extract", "validation", "Message is required", 2);
    }

    let intent = IntentExtractor::new().extract(text);
    let (symbol, source) = match intent {
        Some(intent) => (Some(intent.symbol), Some(intent.source)),
        None => (None, None),
    };

    CommandResult::report(&ExtractReport { command: "extract", status: "ok", text, symbol, source })
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::run;

    fn payload(text: &str) -> Value {
        let result = run(text);
        serde_json::from_str(&result.output).expect("extract output should be JSON")
    }

    #[test]
    fn company_name_resolves_through_table() {
        let report = payload("What is the share price of Apple?");

        assert_eq!(report["status"], "ok");
        assert_eq!(report["symbol"], "AAPL");
        assert_eq!(report["source"], "company_name");
    }

    #[test]
    fn message_without_price_keyword_has_no_symbol() {
        let report = payload("Tell me about Apple");

        assert_eq!(report["status"], "ok");
        assert!(report["symbol"].is_null());
        assert!(report["source"].is_null());
    }

    #[test]
    fn blank_text_is_a_validation_failure() {
        let result = run("  ");

        assert_eq!(result.exit_code, 2);
        let report: Value = serde_json::from_str(&result.output).expect("json");
        assert_eq!(report["error_class"], "validation");
    }
}
