//! [`ConfigStore`] implementations.
//!
//! - [`MemoryConfigStore`] keeps values in process memory.
//! - [`FileConfigStore`] keeps one JSON file per key under a directory
//!   (default `~/.textmods/config/`).
//! - [`HostConfigStore`] forwards to a host's `load_config`/`save_config`
//!   under a per-plugin namespace.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::error::PluginError;
use crate::traits::{ConfigStore, HostBindings};

// ---------------------------------------------------------------------------
// MemoryConfigStore
// ---------------------------------------------------------------------------

/// Config values held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self, key: &str) -> Result<Option<Value>, PluginError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), PluginError> {
        self.values.write().insert(key.to_owned(), value.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileConfigStore
// ---------------------------------------------------------------------------

/// Default config directory.
fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".textmods")
        .join("config")
}

/// Config values stored as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    base_dir: PathBuf,
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self {
            base_dir: default_config_dir(),
        }
    }
}

impl FileConfigStore {
    /// Create a store in the default directory (`~/.textmods/config/`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store rooted at a custom directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: dir.into(),
        }
    }

    /// Directory the store writes into.
    pub fn dir(&self) -> &std::path::Path {
        &self.base_dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, PluginError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(PluginError::Config(format!("invalid config key '{key}'")));
        }
        Ok(self.base_dir.join(format!("{key}.json")))
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self, key: &str) -> Result<Option<Value>, PluginError> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        let value = serde_json::from_str(&json)?;
        debug!(key = %key, path = %path.display(), "loaded config");
        Ok(Some(value))
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), PluginError> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.base_dir)?;

        let json = serde_json::to_string_pretty(value)?;

        // Write to a temp file first, then rename for atomicity
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;

        debug!(key = %key, path = %path.display(), "saved config");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// HostConfigStore
// ---------------------------------------------------------------------------

/// A [`ConfigStore`] backed by the host's config API.
///
/// Keys are prefixed with the owning plugin's name (`<namespace>.<key>`)
/// so plugins never see each other's records.
#[derive(Clone)]
pub struct HostConfigStore {
    host: Arc<dyn HostBindings>,
    namespace: String,
}

impl HostConfigStore {
    pub fn new(host: Arc<dyn HostBindings>, namespace: impl Into<String>) -> Self {
        Self {
            host,
            namespace: namespace.into(),
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}.{key}", self.namespace)
    }
}

impl ConfigStore for HostConfigStore {
    fn load(&self, key: &str) -> Result<Option<Value>, PluginError> {
        self.host.load_config(&self.scoped(key))
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), PluginError> {
        self.host.save_config(&self.scoped(key), value)
    }
}
