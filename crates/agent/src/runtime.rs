use std::sync::Arc;

use tickertalk_core::{
    ChatError, ChatRequest, ChatResponse, ConversationTurn, IntentExtractor, PromptComposer,
    ResponseAssembler,
};
use tracing::{debug, info, warn};

use crate::llm::CompletionClient;
use crate::market_data::MarketDataClient;

/// Runs one chat turn: intent, optional quote, prompt, completion, assembly.
///
/// Holds no per-request state, so one instance is shared by every request.
#[derive(Clone)]
pub struct ChatRuntime {
    extractor: IntentExtractor,
    composer: PromptComposer,
    assembler: ResponseAssembler,
    completion: Arc<dyn CompletionClient>,
    market_data: Option<Arc<dyn MarketDataClient>>,
}

impl ChatRuntime {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        market_data: Option<Arc<dyn MarketDataClient>>,
    ) -> Self {
        Self {
            extractor: IntentExtractor::new(),
            composer: PromptComposer::new(),
            assembler: ResponseAssembler::new(),
            completion,
            market_data,
        }
    }

    pub fn enrichment_enabled(&self) -> bool {
        self.market_data.is_some()
    }

    /// Validates the raw message first; a blank message never reaches either client.
    pub async fn handle_message(
        &self,
        message: &str,
        history: Vec<ConversationTurn>,
    ) -> Result<ChatResponse, ChatError> {
        let request = ChatRequest::new(message, history)?;
        self.handle(&request).await
    }

    pub async fn handle(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let quote = match (self.extractor.extract(request.message()), &self.market_data) {
            (Some(intent), Some(market_data)) => {
                info!(
                    event_name = "agent.chat.stock_intent",
                    symbol = %intent.symbol,
                    source = ?intent.source,
                    "stock price intent detected"
                );
                let quote = market_data.fetch_quote(&intent.symbol).await;
                if quote.is_none() {
                    warn!(
                        event_name = "agent.chat.enrichment_skipped",
                        symbol = %intent.symbol,
                        "no quote available; answering without real-time data"
                    );
                }
                quote
            }
            (Some(intent), None) => {
                debug!(
                    event_name = "agent.chat.enrichment_disabled",
                    symbol = %intent.symbol,
                    "market data disabled; ignoring stock intent"
                );
                None
            }
            (None, _) => None,
        };

        let turns = self.composer.compose(request.message(), request.history(), quote.as_ref());
        let assistant_text = self.completion.complete(&turns).await?;
        let message = self.assembler.assemble(&assistant_text, quote.as_ref());

        info!(
            event_name = "agent.chat.answered",
            enriched = quote.is_some(),
            history_turns = request.history().len(),
            "chat turn answered"
        );

        Ok(ChatResponse::answered(message, quote))
    }
}
