//! Translation requests and the backend ports that serve them.

pub mod model;
pub mod service;

pub use model::{Lang, LanguagePair, TranslationRequest};
pub use service::{ActivationGrant, ActivationRequest, ActivationService, TranslationService};
