//! Script and timestamp detection for chat text.
//!
//! Everything here is pure and total: a text that cannot be classified is a
//! non-match, never an error.

use crate::translation::{Lang, LanguagePair};
use once_cell::sync::Lazy;
use regex::RegexSet;

static TIME_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        // 12:30, 12:30:45, 12:30 PM
        r"^\d{1,2}:\d{2}(:\d{2})?\s*(?i:am|pm)?$",
        // 3 PM
        r"^\d{1,2}\s*(?i:am|pm)$",
        // 12/30, 12/30/2024
        r"^\d{1,2}/\d{1,2}(/\d{2,4})?$",
        // 2024-01-30
        r"^\d{4}-\d{2}-\d{2}$",
        // 30.01.2024
        r"^\d{1,2}\.\d{1,2}(\.\d{2,4})?$",
        r"(?i)^(january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2}(,?\s+\d{4})?$",
        r"(?i)^(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\s+\d{1,2}(,?\s+\d{4})?$",
        r"(?i)^(monday|tuesday|wednesday|thursday|friday|saturday|sunday)$",
        r"(?i)^(mon|tue|wed|thu|fri|sat|sun)$",
        r"(?i)^(today|yesterday|tomorrow)$",
        r"^(今天|昨天|明天|星期[一二三四五六日天])$",
        r"(?i)^\d+\s*(seconds?|minutes?|hours?|days?|weeks?|months?|years?)\s*ago$",
        r"^\d+\s*(秒|分钟?|小时|天|周|月|年)前$",
        r"(?i)^(刚刚|just now)$",
    ])
    .expect("time patterns")
});

/// CJK Unified Ideographs block.
fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// True when the trimmed text is a clock time, date, weekday/month name or
/// relative time ("5 minutes ago", "刚刚").
pub fn is_time_format(text: &str) -> bool {
    TIME_PATTERNS.is_match(text.trim())
}

/// True when the text is digits plus separators only, e.g. "42" or "+1 555-0100".
pub fn is_purely_numeric(text: &str) -> bool {
    let mut saw_digit = false;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        if c.is_ascii_digit() {
            saw_digit = true;
        } else if !matches!(c, '.' | ',' | ':' | '-' | '/' | '+' | '%') {
            return false;
        }
    }
    saw_digit
}

/// No CJK ideographs and at least one Latin letter.
pub fn is_pure_latin_script(text: &str) -> bool {
    !contains_chinese_script(text) && text.chars().any(|c| c.is_ascii_alphabetic())
}

pub fn contains_chinese_script(text: &str) -> bool {
    text.chars().any(is_cjk_ideograph)
}

/// Share of CJK ideographs among non-whitespace characters, `0.0` for blank text.
pub fn chinese_ratio(text: &str) -> f64 {
    let mut total = 0usize;
    let mut cjk = 0usize;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        total += 1;
        if is_cjk_ideograph(c) {
            cjk += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        cjk as f64 / total as f64
    }
}

/// Picks a translation direction for a piece of chat text.
///
/// Uses the conservative ratio policy: zh -> en requires the CJK share to be
/// strictly above `min_chinese_ratio`. A threshold of `0.0` gives the
/// permissive behaviour (any ideograph is enough).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanguageClassifier {
    min_chinese_ratio: f64,
}

impl Default for LanguageClassifier {
    fn default() -> Self {
        Self::new(0.3)
    }
}

impl LanguageClassifier {
    pub fn new(min_chinese_ratio: f64) -> Self {
        Self {
            min_chinese_ratio: min_chinese_ratio.clamp(0.0, 1.0),
        }
    }

    pub fn min_chinese_ratio(&self) -> f64 {
        self.min_chinese_ratio
    }

    /// Returns `None` for timestamps and for text whose language is undetermined.
    pub fn classify(&self, text: &str) -> Option<LanguagePair> {
        if is_time_format(text) {
            return None;
        }
        if is_pure_latin_script(text) {
            return Some(LanguagePair::new(Lang::En, Lang::Zh));
        }
        if contains_chinese_script(text) && chinese_ratio(text) > self.min_chinese_ratio {
            return Some(LanguagePair::new(Lang::Zh, Lang::En));
        }
        None
    }
}
