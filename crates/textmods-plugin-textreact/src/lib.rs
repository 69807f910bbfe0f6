//! Text-to-emoji reaction plugin for textmods.
//!
//! Adds a "Text React" item to the message context menu. The text the
//! user types is spelled out as emoji reactions on that message: letters
//! become letter emoji, spaces become filler squares, and each emoji is
//! used once.
//!
//! Reactions are submitted one per [`TextReactConfig::interval_ms`] and
//! never push a message past [`TextReactConfig::max_reactions`].
//! Stopping the plugin cancels submissions still in flight.

pub mod encoder;
pub mod schedule;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use textmods_plugin::{
    CancellationToken, ContextMenuItem, HostBindings, MenuAction, MessageTarget, Plugin,
    PluginError, PluginManifest,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use encoder::{SymbolEncoder, SymbolToken, normalize};
use schedule::ReactionScheduler;
use types::{MENU_ITEM_ID, MENU_ITEM_LABEL, MESSAGE_MENU, SubmissionReport, TextReactConfig};

/// Symbols to react with for `input` on a message that already has
/// `reaction_count` reactions.
pub fn plan_reactions(
    config: &TextReactConfig,
    encoder: &SymbolEncoder,
    reaction_count: usize,
    input: &str,
) -> Vec<SymbolToken> {
    let max_symbols = config
        .capacity_remaining(reaction_count)
        .min(normalize(input).chars().count());
    encoder.encode(input, max_symbols)
}

type PendingSubmissions = Arc<Mutex<Vec<JoinHandle<SubmissionReport>>>>;

// ---------------------------------------------------------------------------
// TextReactAction
// ---------------------------------------------------------------------------

/// Handler behind the "Text React" menu item.
pub struct TextReactAction {
    host: Arc<dyn HostBindings>,
    config: TextReactConfig,
    encoder: SymbolEncoder,
    scheduler: ReactionScheduler,
    pending: PendingSubmissions,
}

impl TextReactAction {
    /// React to `target` with `input`. Returns `None` when there is
    /// nothing to submit.
    pub fn react(
        &self,
        target: &MessageTarget,
        input: &str,
    ) -> Option<JoinHandle<SubmissionReport>> {
        let symbols = plan_reactions(&self.config, &self.encoder, target.reaction_count, input);
        if symbols.is_empty() {
            debug!(message = %target.message_id, "nothing to react with");
            return None;
        }
        info!(
            channel = %target.channel_id,
            message = %target.message_id,
            count = symbols.len(),
            "scheduling text reactions"
        );
        Some(
            self.scheduler
                .submit(self.host.clone(), target.clone(), symbols),
        )
    }
}

#[async_trait]
impl MenuAction for TextReactAction {
    async fn invoke(&self, target: &MessageTarget, input: &str) -> Result<(), PluginError> {
        if let Some(handle) = self.react(target, input) {
            let mut pending = self.pending.lock();
            pending.retain(|h| !h.is_finished());
            pending.push(handle);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TextReactPlugin
// ---------------------------------------------------------------------------

/// The TextReact plugin.
pub struct TextReactPlugin {
    manifest: PluginManifest,
    config: TextReactConfig,
    cancel: Mutex<CancellationToken>,
    pending: PendingSubmissions,
}

impl Default for TextReactPlugin {
    fn default() -> Self {
        Self::new(TextReactConfig::default())
    }
}

impl TextReactPlugin {
    pub fn new(config: TextReactConfig) -> Self {
        Self {
            manifest: PluginManifest {
                name: "TextReact".into(),
                author: "textmods".into(),
                version: "1.0".into(),
                description: "Adds a 'Text React' option to the context menu of messages, \
                              allowing you to add text as reactions."
                    .into(),
                source: None,
            },
            config,
            cancel: Mutex::new(CancellationToken::new()),
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Wait for every submission started so far and return their reports.
    ///
    /// Handles are taken one at a time. If this future is dropped part way
    /// through, the handle being awaited and every later one stay pending.
    pub async fn wait_idle(&self) -> Vec<SubmissionReport> {
        let mut reports = Vec::new();
        loop {
            let next = {
                let mut pending = self.pending.lock();
                if pending.is_empty() {
                    break;
                }
                pending.remove(0)
            };
            let mut slot = PendingSlot {
                handle: Some(next),
                pending: &self.pending,
            };
            let Some(handle) = slot.handle.as_mut() else {
                break;
            };
            let result = handle.await;
            slot.handle = None;
            match result {
                Ok(report) => reports.push(report),
                Err(e) => warn!(error = %e, "reaction task failed"),
            }
        }
        reports
    }
}

/// Returns a handle to the pending list unless it was awaited to completion.
struct PendingSlot<'a> {
    handle: Option<JoinHandle<SubmissionReport>>,
    pending: &'a PendingSubmissions,
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.pending.lock().insert(0, handle);
        }
    }
}

#[async_trait]
impl Plugin for TextReactPlugin {
    fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    async fn start(&self, host: Arc<dyn HostBindings>) -> Result<(), PluginError> {
        let cancel = {
            let mut guard = self.cancel.lock();
            if guard.is_cancelled() {
                *guard = CancellationToken::new();
            }
            guard.clone()
        };

        let action = TextReactAction {
            host: host.clone(),
            config: self.config.clone(),
            encoder: SymbolEncoder::new(),
            scheduler: ReactionScheduler::new(self.config.interval(), cancel),
            pending: self.pending.clone(),
        };
        host.register_context_menu_item(
            &self.manifest.name,
            ContextMenuItem {
                menu: MESSAGE_MENU.into(),
                id: MENU_ITEM_ID.into(),
                label: MENU_ITEM_LABEL.into(),
                separator: true,
                action: Arc::new(action),
            },
        )
        .map_err(|e| PluginError::LoadFailed(format!("context menu: {e}")))?;
        Ok(())
    }

    async fn stop(&self, host: Arc<dyn HostBindings>) -> Result<(), PluginError> {
        self.cancel.lock().cancel();
        let removed = host.unregister_context_menu_items(&self.manifest.name);
        let reports = self.wait_idle().await;
        let cancelled = reports.iter().filter(|r| r.cancelled).count();
        info!(menu_items = removed, cancelled, "TextReact stopped");
        Ok(())
    }
}
