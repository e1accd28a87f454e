//! Per-message translation state and text extraction.

pub mod extract;
pub mod state;

pub use extract::{MessageText, extract_message_text};
pub use state::{NodeStateTable, SkipReason, TranslationState};
