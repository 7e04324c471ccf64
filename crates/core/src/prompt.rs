use crate::domain::conversation::ConversationTurn;
use crate::domain::quote::Quote;

pub const PERSONA_DIRECTIVE: &str = "You are an expert in investor relations. Define financial and investment terminology clearly and concisely in the context of investor relations. Keep responses focused and professional.";

pub const REAL_TIME_DIRECTIVE: &str = "You are an expert investor relations assistant. IMPORTANT: The user has asked about a stock price, and real-time data has been provided in their message. You MUST use this real-time data in your response. Do NOT say you don't have current data or refer to knowledge cutoffs. Present the real-time stock price data clearly and professionally. For other questions, define financial and investment terminology clearly and concisely in the context of investor relations.";

/// Builds the turn sequence sent to the completion backend:
/// `[system directive] + history + [user turn]`.
#[derive(Clone, Debug, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    pub fn compose(
        &self,
        message: &str,
        history: &[ConversationTurn],
        quote: Option<&Quote>,
    ) -> Vec<ConversationTurn> {
        let (directive, user_content) = match quote {
            Some(quote) => (REAL_TIME_DIRECTIVE, annotate(message, quote)),
            None => (PERSONA_DIRECTIVE, message.to_string()),
        };

        let mut turns = Vec::with_capacity(history.len() + 2);
        turns.push(ConversationTurn::system(directive));
        turns.extend(history.iter().cloned());
        turns.push(ConversationTurn::user(user_content));
        turns
    }
}

pub fn annotate(message: &str, quote: &Quote) -> String {
    format!(
        "{message}\n\n[Real-time stock data for {symbol}: Current price: {currency} {price}, Change: {change} ({percent}), Previous close: {currency} {previous_close}]",
        symbol = quote.symbol,
        currency = quote.currency,
        price = quote.price_display(),
        change = quote.change_display(),
        percent = quote.change_percent_display(),
        previous_close = quote.previous_close_display(),
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{PromptComposer, PERSONA_DIRECTIVE, REAL_TIME_DIRECTIVE};
    use crate::domain::conversation::{ConversationTurn, Role};
    use crate::domain::quote::Quote;

    fn history() -> Vec<ConversationTurn> {
        vec![
            ConversationTurn::user("What is EPS?"),
            ConversationTurn::assistant("Earnings per share."),
        ]
    }

    #[test]
    fn without_quote_uses_persona_and_plain_message() {
        let turns = PromptComposer::new().compose("What is a 10-K?", &history(), None);

        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0], ConversationTurn::system(PERSONA_DIRECTIVE));
        assert_eq!(&turns[1..3], history().as_slice());
        assert_eq!(turns[3], ConversationTurn::user("What is a 10-K?"));
        assert!(!turns[0].content.contains("real-time"));
    }

    #[test]
    fn with_quote_annotates_message_and_switches_directive() {
        let quote = Quote::new(
            "AAPL",
            Decimal::new(15000, 2),
            Decimal::new(10000, 2),
            Some("USD".to_string()),
            Some("REGULAR".to_string()),
        )
        .expect("quote");

        let turns = PromptComposer::new().compose("Apple share price?", &[], Some(&quote));

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, REAL_TIME_DIRECTIVE);
        assert_eq!(turns[1].role, Role::User);
        assert_eq!(
            turns[1].content,
            "Apple share price?\n\n[Real-time stock data for AAPL: Current price: USD 150.00, Change: +50.00 (+50.00%), Previous close: USD 100.00]"
        );
    }

    #[test]
    fn history_is_replayed_verbatim_in_order() {
        let history = vec![
            ConversationTurn::system("earlier directive"),
            ConversationTurn::user("first"),
            ConversationTurn::assistant("second"),
            ConversationTurn::user("third"),
        ];

        let turns = PromptComposer::new().compose("fourth", &history, None);

        let contents = turns.iter().map(|turn| turn.content.as_str()).collect::<Vec<_>>();
        assert_eq!(
            contents,
            [PERSONA_DIRECTIVE, "earlier directive", "first", "second", "third", "fourth"]
        );
    }
}
