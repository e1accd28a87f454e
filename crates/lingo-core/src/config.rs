//! Runtime configuration for the translator.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8089";
pub const DEFAULT_ORIGIN: &str = "https://web.telegram.org";

/// Tunables shared by every component.
///
/// Loaded from `config.toml`; any missing field falls back to its default,
/// so an empty file is a valid configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Base URL of the translation backend, without trailing slash.
    pub api_base_url: String,
    /// Origin whose durable storage holds the session.
    pub origin: String,
    /// Minimum share of CJK characters among non-whitespace characters
    /// for zh -> en classification. Compared with strict greater-than.
    pub chinese_ratio_threshold: f64,
    /// Extracted message text shorter than this is skipped.
    pub min_text_chars: usize,
    /// Upper bound for every backend request.
    pub request_timeout_ms: u64,
    /// Delay between rewriting the compose text and replaying submit.
    pub replay_delay_ms: u64,
    /// Delay before the bulk catch-up pass after the observer attaches.
    pub catch_up_delay_ms: u64,
    /// How long the activation dialog shows its success status.
    pub activation_close_delay_ms: u64,
    /// How long startup waits for the host to report a logged-in page.
    pub login_wait_ms: u64,
    /// Synthetic submits allowed per interception cycle.
    pub max_replays_per_cycle: u32,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            chinese_ratio_threshold: 0.3,
            min_text_chars: 2,
            request_timeout_ms: 15_000,
            replay_delay_ms: 150,
            catch_up_delay_ms: 500,
            activation_close_delay_ms: 1_000,
            login_wait_ms: 60_000,
            max_replays_per_cycle: 1,
        }
    }
}

impl TranslatorConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn replay_delay(&self) -> Duration {
        Duration::from_millis(self.replay_delay_ms)
    }

    pub fn catch_up_delay(&self) -> Duration {
        Duration::from_millis(self.catch_up_delay_ms)
    }

    pub fn activation_close_delay(&self) -> Duration {
        Duration::from_millis(self.activation_close_delay_ms)
    }

    pub fn login_wait(&self) -> Duration {
        Duration::from_millis(self.login_wait_ms)
    }

    /// A config with every delay set to zero, for tests and scripted hosts.
    pub fn immediate() -> Self {
        Self {
            replay_delay_ms: 0,
            catch_up_delay_ms: 0,
            activation_close_delay_ms: 0,
            ..Self::default()
        }
    }
}
