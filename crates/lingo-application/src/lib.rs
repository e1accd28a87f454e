//! Orchestration of the in-page translator over the host ports.
//!
//! Nothing here talks to the network or the file system directly; the
//! backend and the host page come in as trait objects from `lingo-core`.

pub mod activation;
pub mod interceptor;
pub mod pipeline;
pub mod runtime;

pub use activation::ActivationController;
pub use interceptor::{CycleOutcome, KeyDisposition, PendingSend, SendInterceptor, SendPhase};
pub use pipeline::MessagePipeline;
pub use runtime::{BootOutcome, HostPorts, Translator};
