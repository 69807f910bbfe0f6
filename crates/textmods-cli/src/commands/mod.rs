//! CLI command implementations for `textmods`.
//!
//! - [`encode`] -- Text to reaction emoji, without a host.
//! - [`react`] -- TextReact against a local host.
//! - [`rewrite`] -- TextReplacer against a local host.
//! - [`rules_cmd`] -- Rule list editing.

pub mod encode;
pub mod react;
pub mod rewrite;
pub mod rules_cmd;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use textmods_plugin::{FileConfigStore, LocalHost};
use textmods_plugin_textreplacer::RuleStore;

/// Environment variable naming the config directory.
pub const CONFIG_DIR_ENV: &str = "TEXTMODS_CONFIG_DIR";

/// Resolve the config directory.
///
/// Discovery chain:
/// 1. `--config-dir`
/// 2. `TEXTMODS_CONFIG_DIR`
/// 3. `~/.textmods/config`
pub fn config_store(config_dir: Option<&Path>) -> FileConfigStore {
    let env_dir = std::env::var_os(CONFIG_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    match config_dir.map(Path::to_path_buf).or(env_dir) {
        Some(dir) => FileConfigStore::with_dir(dir),
        None => FileConfigStore::new(),
    }
}

/// A local host whose config persists in the resolved directory.
pub fn local_host(config_dir: Option<&Path>) -> Arc<LocalHost> {
    let store = config_store(config_dir);
    tracing::debug!(dir = %store.dir().display(), "using config directory");
    Arc::new(LocalHost::with_config_store(Arc::new(store)))
}

/// The TextReplacer rule store, as the plugin itself would see it.
pub fn rule_store(config_dir: Option<&Path>) -> RuleStore {
    RuleStore::for_host(local_host(config_dir))
}
