use serde::{Deserialize, Serialize};

/// A detached copy of a host element subtree.
///
/// Hosts build these from the live page; the core may prune and read them
/// freely without affecting what the user sees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    #[serde(default)]
    pub classes: Vec<String>,
    /// Text directly owned by this element, before its children.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<ElementSnapshot>,
}

impl ElementSnapshot {
    pub fn new(classes: &[&str]) -> Self {
        Self {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: ElementSnapshot) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// True when every class in `classes` is present.
    pub fn has_all_classes(&self, classes: &[&str]) -> bool {
        classes.iter().all(|c| self.has_class(c))
    }

    /// Depth-first search for the first descendant (or self) matching `pred`.
    pub fn find(&self, pred: &dyn Fn(&ElementSnapshot) -> bool) -> Option<&ElementSnapshot> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(pred))
    }

    /// Removes every descendant matching `pred`, at any depth.
    pub fn prune(&mut self, pred: &dyn Fn(&ElementSnapshot) -> bool) {
        self.children.retain(|child| !pred(child));
        for child in &mut self.children {
            child.prune(pred);
        }
    }

    /// Concatenated text of this element and all descendants, like `textContent`.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}
