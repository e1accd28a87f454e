//! Ports onto the host page.
//!
//! The translator runs inside a chat client it does not control. These
//! traits are the only way the core touches that page; identities handed
//! out by the host are opaque and never imply ownership.

pub mod compose;
pub mod dialog;
pub mod message;
pub mod page;
pub mod snapshot;

pub use compose::{ComposeSurface, ElementId, KeyEvent};
pub use dialog::{ActivationDialog, ActivationStatus, StatusTone};
pub use message::{MessageSurface, MutationEvent, NodeId};
pub use page::{DeviceIdProvider, HostPage, WindowSignal};
pub use snapshot::ElementSnapshot;
