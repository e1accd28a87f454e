use crate::error::Result;

/// Host-issued identity of an editable compose element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// A key-down event observed on the page, before the host handles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub element: ElementId,
    pub key: String,
    pub shift: bool,
    /// Dispatched by the translator itself.
    pub synthetic: bool,
}

impl KeyEvent {
    pub fn enter(element: ElementId) -> Self {
        Self {
            element,
            key: "Enter".to_string(),
            shift: false,
            synthetic: false,
        }
    }

    /// Enter without Shift sends the message; Shift+Enter inserts a newline.
    pub fn is_submit(&self) -> bool {
        self.key == "Enter" && !self.shift
    }
}

/// The compose box of the host chat client.
pub trait ComposeSurface: Send + Sync {
    /// Focused and editable right now.
    fn is_focused_editable(&self, element: ElementId) -> bool;

    fn read_text(&self, element: ElementId) -> String;

    fn write_text(&self, element: ElementId, text: &str) -> Result<()>;

    /// Fires the host's native "text changed" notification.
    fn dispatch_text_changed(&self, element: ElementId) -> Result<()>;

    /// Fires a synthetic submit key event on the element.
    fn dispatch_submit(&self, element: ElementId) -> Result<()>;
}
