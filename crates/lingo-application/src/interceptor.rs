//! Send interceptor.
//!
//! Rewrites outgoing Chinese text to English before the host sends it. One
//! interception cycle per compose element:
//!
//! ```text
//! Idle -> Intercepted -> Rewriting -> Replaying -> Idle
//!              \              |
//!               +-------------+--> Idle (on failure, original text restored)
//! ```
//!
//! Termination relies on the entry guard: a cycle only starts for content
//! that contains Chinese script, and the replayed content is the translation.
//! Synthetic submits dispatched by a cycle are never intercepted again, and
//! each cycle dispatches at most `max_replays_per_cycle` of them.

use crate::activation::ActivationController;
use lingo_core::error::TranslateError;
use lingo_core::host::{ComposeSurface, ElementId, KeyEvent};
use lingo_core::language::contains_chinese_script;
use lingo_core::session::SessionManager;
use lingo_core::translation::{Lang, LanguagePair, TranslationRequest, TranslationService};
use lingo_core::TranslatorConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPhase {
    Idle,
    Intercepted,
    Rewriting,
    Replaying,
}

impl SendPhase {
    /// Phases during which the element's busy marker is held.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Intercepted | Self::Rewriting)
    }
}

/// One in-flight interception cycle, keyed by compose element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub element: ElementId,
    pub original_text: String,
    pub phase: SendPhase,
    pub replays: u32,
}

/// What the host should do with the key event it just reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Let the host handle the event normally.
    PassThrough,
    /// Prevent the host's default handling; a cycle has taken over.
    Suppress,
}

/// How an interception cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The translated text was written back and submit was replayed.
    Replayed(String),
    /// The cycle ended without a replay. Failures before the rewrite leave
    /// the original text in the compose element.
    Aborted,
}

pub struct SendInterceptor {
    compose: Arc<dyn ComposeSurface>,
    translator: Arc<dyn TranslationService>,
    session: Arc<SessionManager>,
    activation: Arc<ActivationController>,
    pending: Mutex<HashMap<ElementId, PendingSend>>,
    replay_delay: Duration,
    max_replays: u32,
}

impl SendInterceptor {
    pub fn new(
        compose: Arc<dyn ComposeSurface>,
        translator: Arc<dyn TranslationService>,
        session: Arc<SessionManager>,
        activation: Arc<ActivationController>,
        config: &TranslatorConfig,
    ) -> Self {
        Self {
            compose,
            translator,
            session,
            activation,
            pending: Mutex::new(HashMap::new()),
            replay_delay: config.replay_delay(),
            max_replays: config.max_replays_per_cycle,
        }
    }

    /// Current cycle phase for `element`; `Idle` when no cycle exists.
    pub fn phase(&self, element: ElementId) -> SendPhase {
        self.lock()
            .get(&element)
            .map(|pending| pending.phase)
            .unwrap_or(SendPhase::Idle)
    }

    pub fn pending(&self, element: ElementId) -> Option<PendingSend> {
        self.lock().get(&element).cloned()
    }

    /// Key-down hook for the host. Suppresses the event and spawns a cycle
    /// when it qualifies; otherwise lets it through.
    ///
    /// A submit on an element whose cycle is still busy is swallowed so the
    /// untranslated text cannot slip out mid-cycle.
    pub fn on_key_down(self: &Arc<Self>, event: &KeyEvent) -> KeyDisposition {
        let Some(text) = self.try_intercept(event) else {
            if event.is_submit() && self.phase(event.element).is_busy() {
                return KeyDisposition::Suppress;
            }
            return KeyDisposition::PassThrough;
        };
        let interceptor = Arc::clone(self);
        let element = event.element;
        tokio::spawn(async move {
            interceptor.run_cycle(element, text).await;
        });
        KeyDisposition::Suppress
    }

    /// Applies the entry guard. On success the element is marked busy in
    /// `Intercepted` and the trimmed text to translate is returned.
    pub fn try_intercept(&self, event: &KeyEvent) -> Option<String> {
        if !event.is_submit() {
            return None;
        }
        let element = event.element;

        if event.synthetic && self.phase(element) == SendPhase::Replaying {
            return None;
        }
        if !self.compose.is_focused_editable(element) {
            return None;
        }
        let text = self.compose.read_text(element);
        let trimmed = text.trim();
        if trimmed.is_empty() || !contains_chinese_script(trimmed) {
            return None;
        }
        if !self.session.is_authorized() {
            // Without a session the original text goes out untranslated.
            return None;
        }

        let mut pending = self.lock();
        if pending.get(&element).is_some_and(|p| p.phase.is_busy()) {
            tracing::debug!(%element, "[Interceptor] Cycle already running");
            return None;
        }
        pending.insert(
            element,
            PendingSend {
                element,
                original_text: text.clone(),
                phase: SendPhase::Intercepted,
                replays: 0,
            },
        );
        tracing::debug!(%element, "[Interceptor] Intercepted submit");
        Some(trimmed.to_string())
    }

    /// Rewrites the element's text and replays submit once.
    pub async fn run_cycle(&self, element: ElementId, text: String) -> CycleOutcome {
        self.set_phase(element, SendPhase::Rewriting);

        if !self.activation.ensure_authorized().await {
            return self.abort(element);
        }

        let Some(request) = TranslationRequest::new(text, LanguagePair::new(Lang::Zh, Lang::En))
        else {
            return self.abort(element);
        };

        let session = self.session.current();
        let translated = match self.translator.translate(&request, &session).await {
            Ok(translated) => translated,
            Err(TranslateError::Unauthorized) => {
                tracing::warn!(%element, "[Interceptor] Session rejected by backend");
                let outcome = self.abort(element);
                self.activation.revoke_and_prompt().await;
                return outcome;
            }
            Err(e) => {
                tracing::warn!(%element, error = %e, "[Interceptor] Translation failed");
                return self.abort(element);
            }
        };

        if let Err(e) = self
            .compose
            .write_text(element, &translated)
            .and_then(|()| self.compose.dispatch_text_changed(element))
        {
            tracing::warn!(%element, error = %e, "[Interceptor] Failed to rewrite compose text");
            return self.abort(element);
        }

        self.set_phase(element, SendPhase::Replaying);
        if !self.replay_delay.is_zero() {
            tokio::time::sleep(self.replay_delay).await;
        }

        if !self.take_replay(element) {
            tracing::warn!(%element, "[Interceptor] Replay limit reached, not resubmitting");
            self.release_replaying(element);
            return CycleOutcome::Aborted;
        }

        let dispatched = self.compose.dispatch_submit(element);
        self.release_replaying(element);

        match dispatched {
            Ok(()) => {
                tracing::info!(%element, "[Interceptor] Sent translated message");
                CycleOutcome::Replayed(translated)
            }
            Err(e) => {
                tracing::warn!(%element, error = %e, "[Interceptor] Failed to replay submit");
                CycleOutcome::Aborted
            }
        }
    }

    /// Counts one replay against the cycle budget.
    ///
    /// The busy marker is already released at this point, so a new user
    /// cycle may have replaced the entry; that entry is not ours to spend.
    fn take_replay(&self, element: ElementId) -> bool {
        let mut pending = self.lock();
        match pending.get_mut(&element) {
            Some(entry) if entry.phase == SendPhase::Replaying && entry.replays < self.max_replays => {
                entry.replays += 1;
                true
            }
            _ => false,
        }
    }

    fn release_replaying(&self, element: ElementId) {
        let mut pending = self.lock();
        if pending.get(&element).is_some_and(|p| p.phase == SendPhase::Replaying) {
            pending.remove(&element);
        }
    }

    /// Ends the cycle and puts the user's text back if it was changed.
    fn abort(&self, element: ElementId) -> CycleOutcome {
        let Some(entry) = self.lock().remove(&element) else {
            return CycleOutcome::Aborted;
        };
        if self.compose.read_text(element) != entry.original_text
            && let Err(e) = self.compose.write_text(element, &entry.original_text)
        {
            tracing::error!(%element, error = %e, "[Interceptor] Failed to restore text");
        }
        CycleOutcome::Aborted
    }

    fn set_phase(&self, element: ElementId, phase: SendPhase) {
        if let Some(entry) = self.lock().get_mut(&element) {
            entry.phase = phase;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ElementId, PendingSend>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}
