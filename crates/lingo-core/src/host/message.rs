use super::snapshot::ElementSnapshot;
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Host-issued identity of one rendered chat bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// A batch of structural changes inside the message container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationEvent {
    /// Newly inserted message candidates, including ones nested in an
    /// inserted subtree.
    Inserted(Vec<NodeId>),
    /// Message nodes detached from the page. The host may attach the same
    /// identity again later (virtualised lists do), so its state is kept.
    Removed(Vec<NodeId>),
    /// Identities the host has retired for good; they are never reported
    /// again.
    Destroyed(Vec<NodeId>),
}

/// The scrollable message list of the host chat client.
#[async_trait]
pub trait MessageSurface: Send + Sync {
    /// Resolves once the message container exists.
    async fn wait_for_container(&self) -> Result<()>;

    /// Attaches a persistent observer to the container.
    fn observe(&self) -> mpsc::UnboundedReceiver<MutationEvent>;

    /// Every message node currently rendered.
    fn current_messages(&self) -> Vec<NodeId>;

    /// Detached copy of the node's subtree, `None` once it is gone.
    fn snapshot(&self, node: NodeId) -> Option<ElementSnapshot>;

    fn is_attached(&self, node: NodeId) -> bool;

    /// Whether a translation annotation is already shown for the node.
    fn has_annotation(&self, node: NodeId) -> bool;

    /// Inserts a translation annotation next to the message content.
    fn append_annotation(&self, node: NodeId, text: &str) -> Result<()>;
}
