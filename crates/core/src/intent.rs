//! Stock-price intent detection.
//!
//! Resolution order is fixed: keyword gate, then the company table, then the
//! symbol patterns. Company names win over symbol-shaped substrings because the
//! patterns produce false positives on ordinary words.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::quote::TickerSymbol;

pub const PRICE_KEYWORDS: [&str; 4] = ["price", "share", "stock", "quote"];

/// Checked in order. Multi-word names must precede their own prefixes.
pub const COMPANY_SYMBOLS: &[(&str, &str)] = &[
    ("apple", "AAPL"),
    ("microsoft", "MSFT"),
    ("google", "GOOGL"),
    ("amazon", "AMZN"),
    ("meta", "META"),
    ("tesla", "TSLA"),
    ("tata steel", "TATASTEEL"),
    ("tata", "TATASTEEL"),
    ("reliance", "RELIANCE"),
    ("infosys", "INFY"),
    ("tcs", "TCS"),
];

/// Symbol-shaped English words. Not exhaustive.
pub const STOP_WORDS: &[&str] = &[
    "THE", "AND", "FOR", "ARE", "BUT", "NOT", "YOU", "ALL", "CAN", "HER", "WAS", "ONE", "OUR",
    "OUT", "DAY", "GET", "HAS", "HIM", "HIS", "HOW", "ITS", "MAY", "NEW", "NOW", "OLD", "SEE",
    "TWO", "WHO", "WAY", "USE", "SHE", "MAN", "HAD", "A", "I", "AN", "AS", "AT", "BE", "BY", "DO",
    "GO", "IF", "IN", "IS", "IT", "ME", "MY", "NO", "OF", "ON", "OR", "SO", "TO", "UP", "US", "WE",
    "WHAT", "WHEN", "WHY",
];

const SYMBOL_SHAPE: &str = r"([A-Z]{2,5}\.[A-Z]{2}|[A-Z]{1,5})";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    CompanyName,
    PricePhrase,
    SymbolPhrase,
    BareSymbol,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StockIntent {
    pub symbol: TickerSymbol,
    pub source: MatchSource,
}

struct SymbolPatterns {
    price_phrase: Regex,
    symbol_phrase: Regex,
    bare_symbol: Regex,
}

fn patterns() -> &'static SymbolPatterns {
    static PATTERNS: OnceLock<SymbolPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| SymbolPatterns {
        price_phrase: compile(&format!(
            r"(?i)(?:share price|stock price|price of|quote for)\s+(?:of\s+)?{SYMBOL_SHAPE}\b"
        )),
        symbol_phrase: compile(&format!(r"(?i)\b{SYMBOL_SHAPE}\s+(?:share|stock)\s+price")),
        bare_symbol: compile(&format!(r"\b{SYMBOL_SHAPE}\b")),
    })
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("symbol patterns are static and valid")
}

fn stop_words() -> &'static HashSet<&'static str> {
    static STOP: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOP.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

#[derive(Clone, Debug, Default)]
pub struct IntentExtractor;

impl IntentExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_symbol(&self, text: &str) -> Option<TickerSymbol> {
        self.extract(text).map(|intent| intent.symbol)
    }

    pub fn extract(&self, text: &str) -> Option<StockIntent> {
        let lowered = text.to_lowercase();
        if !has_price_keyword(&lowered) {
            return None;
        }

        if let Some(symbol) = lookup_company(&lowered) {
            return Some(StockIntent {
                symbol: TickerSymbol(symbol.to_string()),
                source: MatchSource::CompanyName,
            });
        }

        let patterns = patterns();
        let phrase_candidates = [
            (MatchSource::PricePhrase, &patterns.price_phrase),
            (MatchSource::SymbolPhrase, &patterns.symbol_phrase),
        ];
        for (source, pattern) in phrase_candidates {
            let candidate = pattern.captures(text).and_then(|captures| captures.get(1));
            if let Some(symbol) = candidate.and_then(|found| accept_candidate(found.as_str())) {
                return Some(StockIntent { symbol, source });
            }
        }

        patterns
            .bare_symbol
            .captures_iter(text)
            .filter_map(|captures| captures.get(1))
            .find_map(|found| accept_candidate(found.as_str()))
            .map(|symbol| StockIntent { symbol, source: MatchSource::BareSymbol })
    }
}

fn has_price_keyword(lowered: &str) -> bool {
    PRICE_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

fn lookup_company(lowered: &str) -> Option<&'static str> {
    COMPANY_SYMBOLS.iter().find(|(company, _)| lowered.contains(company)).map(|(_, symbol)| *symbol)
}

fn accept_candidate(raw: &str) -> Option<TickerSymbol> {
    let symbol = raw.to_ascii_uppercase();
    if stop_words().contains(symbol.as_str()) {
        return None;
    }
    Some(TickerSymbol(symbol))
}
