//! Pure building blocks of the chat enrichment pipeline: intent detection,
//! prompt composition, reply assembly, and the caller-facing error taxonomy.
//! Nothing in this crate performs I/O.

pub mod config;
pub mod domain;
pub mod errors;
pub mod intent;
pub mod prompt;
pub mod response;

pub use domain::chat::{ChatRequest, ChatResponse};
pub use domain::conversation::{ConversationTurn, Role};
pub use domain::quote::{Quote, TickerSymbol};
pub use errors::{ChatError, CompletionError, ErrorMapper, InterfaceError};
pub use intent::{IntentExtractor, MatchSource, StockIntent};
pub use prompt::PromptComposer;
pub use response::ResponseAssembler;
