//! Message pipeline.
//!
//! Watches the host's message list, decides per node whether to translate,
//! and appends translation annotations. Each node moves through
//! [`TranslationState`] at most once; the compare-and-set operations on
//! [`NodeStateTable`] are what keep duplicate mutation notifications from
//! dispatching a second request.

use crate::activation::ActivationController;
use lingo_core::error::{Result, TranslateError};
use lingo_core::host::{MessageSurface, MutationEvent, NodeId};
use lingo_core::language::{LanguageClassifier, is_purely_numeric, is_time_format};
use lingo_core::message::{NodeStateTable, SkipReason, TranslationState, extract_message_text};
use lingo_core::session::SessionManager;
use lingo_core::translation::{TranslationRequest, TranslationService};
use lingo_core::TranslatorConfig;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

type TaskSlot = Mutex<Option<JoinHandle<()>>>;

/// What a node needs before any state changes.
#[derive(Debug)]
enum Decision {
    /// Already claimed, gone, or waiting for authorization.
    Leave,
    Skip(SkipReason),
    Translate(TranslationRequest),
}

pub struct MessagePipeline {
    surface: Arc<dyn MessageSurface>,
    translator: Arc<dyn TranslationService>,
    session: Arc<SessionManager>,
    activation: Arc<ActivationController>,
    classifier: LanguageClassifier,
    states: NodeStateTable,
    min_text_chars: usize,
    catch_up_delay: Duration,
    started: AtomicBool,
    observer: TaskSlot,
    pending_catch_up: TaskSlot,
}

impl MessagePipeline {
    pub fn new(
        surface: Arc<dyn MessageSurface>,
        translator: Arc<dyn TranslationService>,
        session: Arc<SessionManager>,
        activation: Arc<ActivationController>,
        config: &TranslatorConfig,
    ) -> Self {
        Self {
            surface,
            translator,
            session,
            activation,
            classifier: LanguageClassifier::new(config.chinese_ratio_threshold),
            states: NodeStateTable::new(),
            min_text_chars: config.min_text_chars,
            catch_up_delay: config.catch_up_delay(),
            started: AtomicBool::new(false),
            observer: Mutex::new(None),
            pending_catch_up: Mutex::new(None),
        }
    }

    pub fn state(&self, node: NodeId) -> TranslationState {
        self.states.get(node)
    }

    pub fn states(&self) -> &NodeStateTable {
        &self.states
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Two-phase startup: waits for the message container, then attaches
    /// the observer and schedules one catch-up pass over messages rendered
    /// before it.
    ///
    /// Returns `false` if the pipeline was already running.
    pub async fn start(self: &Arc<Self>) -> Result<bool> {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::debug!("[Pipeline] Already started, skipping");
            return Ok(false);
        }

        if let Err(e) = self.surface.wait_for_container().await {
            self.started.store(false, Ordering::SeqCst);
            return Err(e);
        }

        let events = self.surface.observe();
        tracing::info!("[Pipeline] Observer attached");

        let pipeline = Arc::clone(self);
        let delay = self.catch_up_delay;
        let catch_up = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            pipeline.catch_up().await;
        });
        replace_task(&self.pending_catch_up, catch_up);

        let pipeline = Arc::clone(self);
        replace_task(&self.observer, tokio::spawn(pipeline.run(events)));
        Ok(true)
    }

    /// Detaches the observer and cancels a catch-up pass that has not run
    /// yet. Node tasks already spawned finish on their own.
    pub fn stop(&self) {
        take_task(&self.observer);
        take_task(&self.pending_catch_up);
        self.started.store(false, Ordering::SeqCst);
    }

    async fn run(self: Arc<Self>, mut events: mpsc::UnboundedReceiver<MutationEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                MutationEvent::Inserted(nodes) => {
                    for node in nodes {
                        let pipeline = Arc::clone(&self);
                        tokio::spawn(async move {
                            pipeline.process_node(node).await;
                        });
                    }
                }
                MutationEvent::Removed(nodes) => {
                    tracing::trace!(count = nodes.len(), "[Pipeline] Nodes detached");
                }
                MutationEvent::Destroyed(nodes) => {
                    for node in nodes {
                        self.states.forget(node);
                    }
                }
            }
        }
        self.started.store(false, Ordering::SeqCst);
        tracing::info!("[Pipeline] Observer closed");
    }

    /// Processes every message currently on the page and waits for all of
    /// them. Nodes that already left `Untouched` are no-ops.
    ///
    /// Returns the number of nodes examined.
    pub async fn catch_up(self: &Arc<Self>) -> usize {
        let nodes = self.surface.current_messages();
        let count = nodes.len();
        tracing::debug!(count, "[Pipeline] Catch-up pass");

        // Cancelling this pass drops the handles, which detaches node tasks.
        let tasks: Vec<_> = nodes
            .into_iter()
            .map(|node| {
                let pipeline = Arc::clone(self);
                tokio::spawn(async move { pipeline.process_node(node).await })
            })
            .collect();
        for task in tasks {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "[Pipeline] Node task failed");
            }
        }
        count
    }

    /// Runs one node through the pipeline and returns its resulting state.
    ///
    /// A node that is not `Untouched` is left alone. A node seen while the
    /// session is unauthorized also stays `Untouched` so a later catch-up
    /// pass can pick it up.
    pub async fn process_node(&self, node: NodeId) -> TranslationState {
        let request = match self.decide(node).await {
            Decision::Leave => return self.states.get(node),
            Decision::Skip(reason) => {
                let skipped = TranslationState::Skipped(reason);
                if self.states.claim(node, skipped) {
                    tracing::debug!(%node, %reason, "[Pipeline] Skipped");
                }
                return self.states.get(node);
            }
            Decision::Translate(request) => request,
        };

        if !self.states.claim(node, TranslationState::Processing) {
            return self.states.get(node);
        }

        tracing::debug!(%node, pair = %request.pair(), "[Pipeline] Translating");
        let terminal = self.translate(node, &request).await;
        if !self.states.finish(node, terminal) {
            tracing::debug!(%node, "[Pipeline] Node retired while translating");
        }
        self.states.get(node)
    }

    async fn decide(&self, node: NodeId) -> Decision {
        if self.states.get(node) != TranslationState::Untouched {
            return Decision::Leave;
        }
        let Some(snapshot) = self.surface.snapshot(node) else {
            return Decision::Leave;
        };
        if self.surface.has_annotation(node) {
            return Decision::Skip(SkipReason::Duplicate);
        }

        let text = match extract_message_text(&snapshot) {
            Some(text) if text.char_count() >= self.min_text_chars => text,
            _ => return Decision::Skip(SkipReason::NoResult),
        };
        if is_time_format(text.as_str()) || is_purely_numeric(text.as_str()) {
            return Decision::Skip(SkipReason::TimeFormat);
        }
        let Some(pair) = self.classifier.classify(text.as_str()) else {
            return Decision::Skip(SkipReason::LanguageUndetermined);
        };

        if !self.activation.ensure_authorized().await {
            return Decision::Leave;
        }

        match TranslationRequest::new(text.0, pair) {
            Some(request) => Decision::Translate(request),
            None => Decision::Skip(SkipReason::NoResult),
        }
    }

    async fn translate(&self, node: NodeId, request: &TranslationRequest) -> TranslationState {
        let no_result = TranslationState::Skipped(SkipReason::NoResult);
        let session = self.session.current();

        let translated = match self.translator.translate(request, &session).await {
            Ok(translated) => translated,
            Err(TranslateError::Unauthorized) => {
                tracing::warn!(%node, "[Pipeline] Session rejected by backend");
                self.activation.revoke_and_prompt().await;
                return no_result;
            }
            Err(e) => {
                tracing::debug!(%node, error = %e, "[Pipeline] Translation failed");
                return no_result;
            }
        };

        let translated = translated.trim();
        if translated.to_lowercase() == request.text().to_lowercase() {
            return no_result;
        }

        if !self.surface.is_attached(node) {
            return no_result;
        }
        if self.surface.has_annotation(node) {
            return TranslationState::Skipped(SkipReason::Duplicate);
        }
        match self.surface.append_annotation(node, translated) {
            Ok(()) => TranslationState::Done,
            Err(e) => {
                tracing::warn!(%node, error = %e, "[Pipeline] Failed to insert annotation");
                no_result
            }
        }
    }
}

fn replace_task(slot: &TaskSlot, handle: JoinHandle<()>) {
    let previous = slot.lock().unwrap_or_else(|e| e.into_inner()).replace(handle);
    if let Some(previous) = previous {
        previous.abort();
    }
}

fn take_task(slot: &TaskSlot) {
    let handle = slot.lock().unwrap_or_else(|e| e.into_inner()).take();
    if let Some(handle) = handle {
        handle.abort();
    }
}
