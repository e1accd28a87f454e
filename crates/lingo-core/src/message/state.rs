use crate::host::NodeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// Why a message was left without an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    TimeFormat,
    LanguageUndetermined,
    NoResult,
    Duplicate,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TimeFormat => "time-format",
            Self::LanguageUndetermined => "language-undetermined",
            Self::NoResult => "no-result",
            Self::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of one message node.
///
/// `Untouched -> Processing -> Done | Skipped`, or `Untouched -> Skipped`
/// directly. `Done` and `Skipped` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationState {
    #[default]
    Untouched,
    Processing,
    Done,
    Skipped(SkipReason),
}

impl TranslationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Skipped(_))
    }
}

impl fmt::Display for TranslationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Untouched => f.write_str("untouched"),
            Self::Processing => f.write_str("processing"),
            Self::Done => f.write_str("done"),
            Self::Skipped(reason) => write!(f, "skipped({reason})"),
        }
    }
}

/// Side table of node states, keyed by host node identity.
///
/// The table never owns the nodes. An entry outlives detachment of its node
/// and is only dropped with [`NodeStateTable::forget`] once the host retires
/// the identity.
#[derive(Debug, Default)]
pub struct NodeStateTable {
    states: Mutex<HashMap<NodeId, TranslationState>>,
}

impl NodeStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node: NodeId) -> TranslationState {
        self.lock().get(&node).copied().unwrap_or_default()
    }

    /// Leaves `Untouched` for `next`. Returns `false` if the node already
    /// left `Untouched`, in which case nothing changes.
    pub fn claim(&self, node: NodeId, next: TranslationState) -> bool {
        let mut states = self.lock();
        let current = states.get(&node).copied().unwrap_or_default();
        if current != TranslationState::Untouched || next == TranslationState::Untouched {
            return false;
        }
        states.insert(node, next);
        true
    }

    /// Moves a `Processing` node to a terminal state.
    pub fn finish(&self, node: NodeId, terminal: TranslationState) -> bool {
        if !terminal.is_terminal() {
            return false;
        }
        let mut states = self.lock();
        match states.get_mut(&node) {
            Some(state) if *state == TranslationState::Processing => {
                *state = terminal;
                true
            }
            _ => false,
        }
    }

    pub fn forget(&self, node: NodeId) {
        self.lock().remove(&node);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of tracked nodes currently in `state`.
    pub fn count(&self, state: TranslationState) -> usize {
        self.lock().values().filter(|s| **s == state).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<NodeId, TranslationState>> {
        self.states.lock().unwrap_or_else(|e| e.into_inner())
    }
}
