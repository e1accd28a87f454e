//! Authorization session: model, durable store port and manager.

pub mod manager;
pub mod model;
pub mod store;


pub use manager::SessionManager;
pub use model::{Session, StoredCredentials, redact_token};
pub use store::SessionStore;
