use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Zh,
}

impl Lang {
    /// Wire code sent to the backend.
    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Zh => "zh",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = String;

    /// Accepts the wire codes plus the browser-style `zh-CN`/`en-US` forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" | "english" => Ok(Lang::En),
            "zh" | "zh-cn" | "zh-hans" | "chinese" => Ok(Lang::Zh),
            other => Err(format!("unsupported language code: {other}")),
        }
    }
}

/// Direction of one translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: Lang,
    pub target: Lang,
}

impl LanguagePair {
    pub fn new(source: Lang, target: Lang) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}

/// One immutable unit of translation work. Never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    text: String,
    pair: LanguagePair,
}

impl TranslationRequest {
    /// Returns `None` when `text` is blank after trimming or the pair
    /// translates a language into itself.
    pub fn new(text: impl Into<String>, pair: LanguagePair) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() || pair.source == pair.target {
            return None;
        }
        Some(Self { text, pair })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pair(&self) -> LanguagePair {
        self.pair
    }

    pub fn source(&self) -> Lang {
        self.pair.source
    }

    pub fn target(&self) -> Lang {
        self.pair.target
    }
}
