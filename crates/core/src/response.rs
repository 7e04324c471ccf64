use crate::domain::quote::Quote;

pub const QUOTE_DIVIDER: &str = "---";

/// Puts the quote block ahead of the narrative so real-time data is never
/// buried under the assistant's text.
#[derive(Clone, Debug, Default)]
pub struct ResponseAssembler;

impl ResponseAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, assistant_text: &str, quote: Option<&Quote>) -> String {
        match quote {
            Some(quote) => format!("{}{assistant_text}", quote_block(quote)),
            None => assistant_text.to_string(),
        }
    }
}

pub fn quote_block(quote: &Quote) -> String {
    format!(
        "📊 **{symbol} Real-time Stock Price**\n\n\
         💰 **Current Price:** {currency} {price}\n\
         📈 **Change:** {change} ({percent})\n\
         📉 **Previous Close:** {currency} {previous_close}\n\
         🕐 **Market Status:** {state}\n\n\
         {QUOTE_DIVIDER}\n\n",
        symbol = quote.symbol,
        currency = quote.currency,
        price = quote.price_display(),
        change = quote.change_display(),
        percent = quote.change_percent_display(),
        previous_close = quote.previous_close_display(),
        state = quote.market_state,
    )
}
