//! [`LocalHost`] -- an in-process [`HostBindings`] implementation.
//!
//! Stands in for the chat client: it keeps installed send patches and
//! menu items, runs patches when a message is sent, and records every
//! reaction instead of transmitting it. Config goes to any
//! [`ConfigStore`], in memory by default.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::PluginError;
use crate::message::{MessageTarget, OutgoingMessage, ReactionEmoji};
use crate::store::MemoryConfigStore;
use crate::traits::{
    ConfigStore, ContextMenuItem, HostBindings, MenuAction, PatchId, SendInterceptor,
};

/// A reaction the host was asked to add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedReaction {
    pub channel_id: String,
    pub message_id: String,
    pub emoji: ReactionEmoji,
    pub at: DateTime<Utc>,
}

/// A rendered context-menu entry, as the user would see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub owner: String,
    pub id: String,
    pub label: String,
    pub separator: bool,
}

struct Patch {
    id: PatchId,
    owner: String,
    interceptor: Arc<dyn SendInterceptor>,
}

struct OwnedMenuItem {
    owner: String,
    item: ContextMenuItem,
}

/// In-process host.
pub struct LocalHost {
    config: Arc<dyn ConfigStore>,
    patches: RwLock<Vec<Patch>>,
    next_patch_id: AtomicU64,
    menu_items: RwLock<Vec<OwnedMenuItem>>,
    reactions: Mutex<Vec<RecordedReaction>>,
}

impl Default for LocalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalHost {
    /// Create a host with in-memory config.
    pub fn new() -> Self {
        Self::with_config_store(Arc::new(MemoryConfigStore::new()))
    }

    /// Create a host whose config lives in `config`.
    pub fn with_config_store(config: Arc<dyn ConfigStore>) -> Self {
        Self {
            config,
            patches: RwLock::new(Vec::new()),
            next_patch_id: AtomicU64::new(1),
            menu_items: RwLock::new(Vec::new()),
            reactions: Mutex::new(Vec::new()),
        }
    }

    /// Send a message: run every installed patch in install order and
    /// return the message as it would be transmitted.
    pub fn send_message(&self, mut message: OutgoingMessage) -> OutgoingMessage {
        let interceptors: Vec<Arc<dyn SendInterceptor>> = self
            .patches
            .read()
            .iter()
            .map(|p| p.interceptor.clone())
            .collect();
        for interceptor in interceptors {
            interceptor.before_send(&mut message);
        }
        message
    }

    /// Number of installed send patches.
    pub fn patch_count(&self) -> usize {
        self.patches.read().len()
    }

    /// Entries of a context menu, in registration order.
    pub fn menu_entries(&self, menu: &str) -> Vec<MenuEntry> {
        self.menu_items
            .read()
            .iter()
            .filter(|o| o.item.menu == menu)
            .map(|o| MenuEntry {
                owner: o.owner.clone(),
                id: o.item.id.clone(),
                label: o.item.label.clone(),
                separator: o.item.separator,
            })
            .collect()
    }

    /// Pick a context-menu item on `target`, answering its prompt with `input`.
    pub async fn invoke_menu_item(
        &self,
        menu: &str,
        id: &str,
        target: &MessageTarget,
        input: &str,
    ) -> Result<(), PluginError> {
        let action: Arc<dyn MenuAction> = self
            .menu_items
            .read()
            .iter()
            .find(|o| o.item.menu == menu && o.item.id == id)
            .map(|o| o.item.action.clone())
            .ok_or_else(|| PluginError::NotFound(format!("menu item {menu}/{id}")))?;
        action.invoke(target, input).await
    }

    /// Reactions added so far, oldest first.
    pub fn reactions(&self) -> Vec<RecordedReaction> {
        self.reactions.lock().clone()
    }
}

#[async_trait]
impl HostBindings for LocalHost {
    fn patch_before_send(
        &self,
        owner: &str,
        interceptor: Arc<dyn SendInterceptor>,
    ) -> Result<PatchId, PluginError> {
        let id = self.next_patch_id.fetch_add(1, Ordering::Relaxed);
        self.patches.write().push(Patch {
            id,
            owner: owner.to_owned(),
            interceptor,
        });
        info!(owner = %owner, patch = id, "installed before-send patch");
        Ok(id)
    }

    fn unpatch_all(&self, owner: &str) -> usize {
        let mut patches = self.patches.write();
        let before = patches.len();
        patches.retain(|p| {
            let keep = p.owner != owner;
            if !keep {
                debug!(owner = %owner, patch = p.id, "removing before-send patch");
            }
            keep
        });
        before - patches.len()
    }

    async fn add_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        reaction: &ReactionEmoji,
    ) -> Result<(), PluginError> {
        debug!(channel = %channel_id, message = %message_id, emoji = %reaction.name, "adding reaction");
        self.reactions.lock().push(RecordedReaction {
            channel_id: channel_id.to_owned(),
            message_id: message_id.to_owned(),
            emoji: reaction.clone(),
            at: Utc::now(),
        });
        Ok(())
    }

    fn register_context_menu_item(
        &self,
        owner: &str,
        item: ContextMenuItem,
    ) -> Result<(), PluginError> {
        let mut items = self.menu_items.write();
        if items
            .iter()
            .any(|o| o.item.menu == item.menu && o.item.id == item.id)
        {
            return Err(PluginError::ExecutionFailed(format!(
                "menu item {}/{} already registered",
                item.menu, item.id
            )));
        }
        info!(owner = %owner, menu = %item.menu, id = %item.id, "registered menu item");
        items.push(OwnedMenuItem {
            owner: owner.to_owned(),
            item,
        });
        Ok(())
    }

    fn unregister_context_menu_items(&self, owner: &str) -> usize {
        let mut items = self.menu_items.write();
        let before = items.len();
        items.retain(|o| o.owner != owner);
        before - items.len()
    }

    fn load_config(&self, key: &str) -> Result<Option<Value>, PluginError> {
        self.config.load(key)
    }

    fn save_config(&self, key: &str, value: &Value) -> Result<(), PluginError> {
        self.config.save(key, value)
    }
}
