//! Clean text extraction from a message bubble.

use crate::host::ElementSnapshot;

/// Class combinations that mark the textual part of a bubble, in priority order.
const TEXT_SELECTORS: &[&[&str]] = &[&["message", "spoilers-container"], &["message"], &["text-content"]];

/// Classes whose elements carry timestamps, receipts or decoration.
const NOISE_CLASSES: &[&str] = &[
    "time",
    "time-inner",
    "message-time",
    "bubble-time",
    "read-receipt",
    "reactions",
    "emoji",
    "custom-emoji",
    "translated-text",
];

/// Text pulled out of a bubble, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(pub String);

impl MessageText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

fn is_noise(element: &ElementSnapshot) -> bool {
    element.classes.iter().any(|class| {
        NOISE_CLASSES.contains(&class.as_str()) || class.contains("time")
    })
}

/// Locates the textual sub-element of `bubble` and returns its text with
/// noise stripped. Works on a copy; `bubble` is left as is.
///
/// Returns `None` if the bubble has no textual sub-element.
pub fn extract_message_text(bubble: &ElementSnapshot) -> Option<MessageText> {
    let text_element = TEXT_SELECTORS
        .iter()
        .find_map(|selector| bubble.find(&|e| e.has_all_classes(selector)))?;

    let mut detached = text_element.clone();
    detached.prune(&is_noise);
    Some(MessageText(detached.text_content().trim().to_string()))
}
