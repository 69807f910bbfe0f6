//! Outgoing message rewriting plugin for textmods.
//!
//! Every message the user sends passes through an ordered list of regex
//! rules before it reaches the host. The default rules swap social media
//! links for embed-friendly mirrors. The rule list is persisted through
//! the host config and can be edited at runtime via [`RuleStore`].

pub mod error;
pub mod rewriter;
pub mod rules;
pub mod store;
pub mod template;

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use textmods_plugin::{HostBindings, PatchId, Plugin, PluginError, PluginManifest};
use tracing::info;

pub use error::RuleError;
pub use rewriter::{CompiledRule, EMPTY_MESSAGE_PLACEHOLDER, RuleRewriter, rewrite};
pub use rules::{
    ReplacerSettings, Rule, RuleField, RuleFieldUpdate, RuleSet, default_rules,
};
pub use store::{PLUGIN_NAME, RuleStore, SETTINGS_KEY};
pub use template::ReplacementTemplate;

/// The TextReplacer plugin.
pub struct TextReplacerPlugin {
    manifest: PluginManifest,
    store: RwLock<Option<Arc<RuleStore>>>,
    /// Installed before-send patch, while running.
    patch: RwLock<Option<PatchId>>,
}

impl Default for TextReplacerPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl TextReplacerPlugin {
    pub fn new() -> Self {
        Self {
            manifest: PluginManifest {
                name: PLUGIN_NAME.into(),
                author: "textmods".into(),
                version: "1.2".into(),
                description: "Replaces text in your messages using regular expressions \
                              before they are sent."
                    .into(),
                source: None,
            },
            store: RwLock::new(None),
            patch: RwLock::new(None),
        }
    }

    /// The rule store, once the plugin has been started.
    pub fn settings(&self) -> Option<Arc<RuleStore>> {
        self.store.read().clone()
    }
}

#[async_trait]
impl Plugin for TextReplacerPlugin {
    fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    async fn start(&self, host: Arc<dyn HostBindings>) -> Result<(), PluginError> {
        let mut installed = self.patch.write();
        if let Some(patch) = *installed {
            return Err(PluginError::LoadFailed(format!(
                "{} already started (patch {patch})",
                self.manifest.name
            )));
        }

        let store = Arc::new(RuleStore::for_host(host.clone()));
        let rewriter = Arc::new(RuleRewriter::new(store.clone()));
        let patch = host.patch_before_send(&self.manifest.name, rewriter)?;
        let rules = store.load_rules();
        info!(
            patch,
            rules = rules.len(),
            enabled = rules.iter().filter(|r| r.enabled).count(),
            "TextReplacer started"
        );
        *self.store.write() = Some(store);
        *installed = Some(patch);
        Ok(())
    }

    async fn stop(&self, host: Arc<dyn HostBindings>) -> Result<(), PluginError> {
        self.patch.write().take();
        let removed = host.unpatch_all(&self.manifest.name);
        info!(patches = removed, "TextReplacer stopped");
        Ok(())
    }
}
