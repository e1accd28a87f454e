//! HTTP transport for the Lingo translator backend.

pub mod backend_client;
mod dto;

pub use backend_client::BackendClient;
