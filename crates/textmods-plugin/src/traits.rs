//! Plugin trait definitions.
//!
//! - [`Plugin`] -- lifecycle and metadata
//! - [`HostBindings`] -- everything a plugin may ask of the host
//! - [`SendInterceptor`] -- synchronous before-send hook
//! - [`MenuAction`] -- handler behind a context-menu item
//! - [`ConfigStore`] -- persisted JSON configuration by key
//!
//! All traits are `Send + Sync`. Async methods use `#[async_trait]`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

pub use tokio_util::sync::CancellationToken;

use crate::error::PluginError;
use crate::manifest::PluginManifest;
use crate::message::{MessageTarget, OutgoingMessage, ReactionEmoji};

/// Identifier of an installed before-send patch.
pub type PatchId = u64;

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// A plugin installed into the host.
///
/// `start` installs every patch and menu item the plugin needs; `stop`
/// must remove all of them again. Both receive the same host handle.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Plugin metadata.
    fn manifest(&self) -> &PluginManifest;

    /// Install the plugin's hooks into the host.
    async fn start(&self, host: Arc<dyn HostBindings>) -> Result<(), PluginError>;

    /// Remove the plugin's hooks and cancel outstanding work.
    async fn stop(&self, host: Arc<dyn HostBindings>) -> Result<(), PluginError>;
}

// ---------------------------------------------------------------------------
// SendInterceptor
// ---------------------------------------------------------------------------

/// Hook run on every outgoing message before the host transmits it.
///
/// Runs synchronously on the sending path: the host does not proceed
/// until `before_send` returns. Implementations must not fail; anything
/// that goes wrong is handled internally and the message is left as is.
pub trait SendInterceptor: Send + Sync {
    fn before_send(&self, message: &mut OutgoingMessage);
}

// ---------------------------------------------------------------------------
// Context menu
// ---------------------------------------------------------------------------

/// Handler invoked when the user picks a context-menu item.
///
/// `input` is the text the user entered in the item's prompt.
#[async_trait]
pub trait MenuAction: Send + Sync {
    async fn invoke(&self, target: &MessageTarget, input: &str) -> Result<(), PluginError>;
}

/// A context-menu item contributed by a plugin.
#[derive(Clone)]
pub struct ContextMenuItem {
    /// Which host menu to extend (e.g. `"message"`).
    pub menu: String,

    /// Stable item id.
    pub id: String,

    /// Label shown to the user.
    pub label: String,

    /// Whether a separator is placed before the item.
    pub separator: bool,

    /// What happens when the item is picked.
    pub action: Arc<dyn MenuAction>,
}

impl fmt::Debug for ContextMenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextMenuItem")
            .field("menu", &self.menu)
            .field("id", &self.id)
            .field("label", &self.label)
            .field("separator", &self.separator)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// ConfigStore
// ---------------------------------------------------------------------------

/// Persisted configuration, one JSON value per key.
///
/// `save` replaces the whole value for a key; there is no partial update.
pub trait ConfigStore: Send + Sync {
    /// Load the value stored under `key`. Returns `None` if never saved.
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, PluginError>;

    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), PluginError>;
}

// ---------------------------------------------------------------------------
// HostBindings
// ---------------------------------------------------------------------------

/// Services the host exposes to plugins.
///
/// A real implementation binds these to the chat client's runtime patching
/// and internal APIs; [`LocalHost`](crate::LocalHost) implements them
/// in-process.
#[async_trait]
pub trait HostBindings: Send + Sync {
    /// Install a before-send interceptor owned by `owner`.
    fn patch_before_send(
        &self,
        owner: &str,
        interceptor: Arc<dyn SendInterceptor>,
    ) -> Result<PatchId, PluginError>;

    /// Remove every patch owned by `owner`. Returns how many were removed.
    fn unpatch_all(&self, owner: &str) -> usize;

    /// Add one reaction to a message.
    async fn add_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        reaction: &ReactionEmoji,
    ) -> Result<(), PluginError>;

    /// Add an item to one of the host's context menus.
    fn register_context_menu_item(
        &self,
        owner: &str,
        item: ContextMenuItem,
    ) -> Result<(), PluginError>;

    /// Remove every menu item owned by `owner`. Returns how many were removed.
    fn unregister_context_menu_items(&self, owner: &str) -> usize;

    /// Load a persisted config value.
    fn load_config(&self, key: &str) -> Result<Option<serde_json::Value>, PluginError>;

    /// Persist a config value.
    fn save_config(&self, key: &str, value: &serde_json::Value) -> Result<(), PluginError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time assertion that a type is Send + Sync.
    fn assert_send_sync<T: Send + Sync + ?Sized>() {}

    #[test]
    fn test_traits_are_send_sync() {
        assert_send_sync::<dyn Plugin>();
        assert_send_sync::<dyn HostBindings>();
        assert_send_sync::<dyn SendInterceptor>();
        assert_send_sync::<dyn MenuAction>();
        assert_send_sync::<dyn ConfigStore>();
        assert_send_sync::<ContextMenuItem>();
    }

    struct Shout;

    impl SendInterceptor for Shout {
        fn before_send(&self, message: &mut OutgoingMessage) {
            message.content = message.content.to_uppercase();
        }
    }

    struct Noop;

    #[async_trait]
    impl MenuAction for Noop {
        async fn invoke(&self, _target: &MessageTarget, _input: &str) -> Result<(), PluginError> {
            Ok(())
        }
    }

    #[test]
    fn test_interceptor_mutates_in_place() {
        let mut msg = OutgoingMessage::new("c1", "hello");
        Shout.before_send(&mut msg);
        assert_eq!(msg.content, "HELLO");
        assert_eq!(msg.channel_id, "c1");
    }

    #[tokio::test]
    async fn test_menu_action_trait_object() {
        let action: Arc<dyn MenuAction> = Arc::new(Noop);
        let target = MessageTarget::new("c1", "m1", 0);
        action.invoke(&target, "hi").await.unwrap();
    }

    #[test]
    fn test_context_menu_item_debug_skips_action() {
        let item = ContextMenuItem {
            menu: "message".into(),
            id: "noop".into(),
            label: "Noop".into(),
            separator: false,
            action: Arc::new(Noop),
        };
        let debug = format!("{item:?}");
        assert!(debug.contains("\"noop\""));
        assert!(!debug.contains("action"));
    }
}
