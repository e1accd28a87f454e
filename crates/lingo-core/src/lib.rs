//! Domain model and ports for the Lingo in-page translator.
//!
//! This crate holds everything that does not touch the network, the file
//! system or a concrete host page: language classification, the session
//! model and its manager, per-message translation state, and the traits the
//! outer crates implement.

pub mod clock;
pub mod config;
pub mod error;
pub mod host;
pub mod language;
pub mod message;
pub mod session;
pub mod translation;

// Re-export common error types
pub use error::{ActivationError, LingoError, TranslateError};

pub use clock::{Clock, SystemClock};
pub use config::TranslatorConfig;
pub use language::LanguageClassifier;
pub use session::{Session, SessionManager, SessionStore};
pub use translation::{Lang, LanguagePair, TranslationRequest};
