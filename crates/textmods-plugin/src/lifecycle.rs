//! [`PluginManager`] -- starts and stops plugins against one host.
//!
//! The manager is responsible for:
//!
//! - Validating each plugin's manifest on registration
//! - Starting and stopping plugins, individually or all at once
//! - Tracking which plugins are running

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info, warn};

use crate::error::PluginError;
use crate::traits::{HostBindings, Plugin};

/// Manages the lifecycle of a set of plugins on one host.
pub struct PluginManager {
    host: Arc<dyn HostBindings>,
    /// Registered plugins, in registration order.
    plugins: RwLock<Vec<Arc<dyn Plugin>>>,
    /// Names of plugins whose `start` succeeded.
    running: RwLock<HashSet<String>>,
}

impl PluginManager {
    pub fn new(host: Arc<dyn HostBindings>) -> Self {
        Self {
            host,
            plugins: RwLock::new(Vec::new()),
            running: RwLock::new(HashSet::new()),
        }
    }

    /// Register a plugin. Fails if the manifest is invalid or the name is
    /// already taken.
    pub fn register(&self, plugin: Arc<dyn Plugin>) -> Result<(), PluginError> {
        let manifest = plugin.manifest();
        manifest.validate()?;

        let mut plugins = self.plugins.write();
        if plugins.iter().any(|p| p.manifest().name == manifest.name) {
            return Err(PluginError::LoadFailed(format!(
                "plugin '{}' is already registered",
                manifest.name
            )));
        }
        info!(plugin = %manifest.name, version = %manifest.version, "registering plugin");
        plugins.push(plugin);
        Ok(())
    }

    /// Names of registered plugins, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.plugins
            .read()
            .iter()
            .map(|p| p.manifest().name.clone())
            .collect()
    }

    /// Whether `name` is currently running.
    pub fn is_running(&self, name: &str) -> bool {
        self.running.read().contains(name)
    }

    fn find(&self, name: &str) -> Result<Arc<dyn Plugin>, PluginError> {
        self.plugins
            .read()
            .iter()
            .find(|p| p.manifest().name == name)
            .cloned()
            .ok_or_else(|| PluginError::NotFound(format!("plugin '{name}'")))
    }

    /// Start one plugin. Starting a running plugin is a no-op.
    pub async fn start(&self, name: &str) -> Result<(), PluginError> {
        let plugin = self.find(name)?;
        if self.is_running(name) {
            warn!(plugin = %name, "plugin already running");
            return Ok(());
        }

        info!(plugin = %name, "starting plugin");
        if let Err(e) = plugin.start(self.host.clone()).await {
            error!(plugin = %name, error = %e, "plugin failed to start");
            return Err(e);
        }
        self.running.write().insert(name.to_owned());
        Ok(())
    }

    /// Stop one plugin. Stopping a plugin that is not running is a no-op.
    pub async fn stop(&self, name: &str) -> Result<(), PluginError> {
        let plugin = self.find(name)?;
        if !self.running.write().remove(name) {
            return Ok(());
        }

        info!(plugin = %name, "stopping plugin");
        plugin.stop(self.host.clone()).await.inspect_err(|e| {
            error!(plugin = %name, error = %e, "plugin failed to stop cleanly");
        })
    }

    /// Start every registered plugin, continuing past failures.
    ///
    /// Returns `(plugin_name, result)` for each plugin.
    pub async fn start_all(&self) -> Vec<(String, Result<(), PluginError>)> {
        let names = self.names();
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            let result = self.start(&name).await;
            results.push((name, result));
        }
        results
    }

    /// Stop every running plugin in reverse registration order.
    pub async fn stop_all(&self) -> Vec<(String, Result<(), PluginError>)> {
        let names: Vec<String> = self
            .names()
            .into_iter()
            .rev()
            .filter(|n| self.is_running(n))
            .collect();
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            let result = self.stop(&name).await;
            results.push((name, result));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::local::LocalHost;
    use crate::manifest::PluginManifest;

    struct Counting {
        manifest: PluginManifest,
        starts: AtomicUsize,
        stops: AtomicUsize,
        fail_start: bool,
    }

    impl Counting {
        fn new(name: &str, fail_start: bool) -> Arc<Self> {
            Arc::new(Self {
                manifest: PluginManifest {
                    name: name.into(),
                    author: "test".into(),
                    version: "1.0.0".into(),
                    description: String::new(),
                    source: None,
                },
                starts: AtomicUsize::new(0),
                stops: AtomicUsize::new(0),
                fail_start,
            })
        }
    }

    #[async_trait]
    impl Plugin for Counting {
        fn manifest(&self) -> &PluginManifest {
            &self.manifest
        }

        async fn start(&self, _host: Arc<dyn HostBindings>) -> Result<(), PluginError> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            if self.fail_start {
                return Err(PluginError::LoadFailed("boom".into()));
            }
            Ok(())
        }

        async fn stop(&self, _host: Arc<dyn HostBindings>) -> Result<(), PluginError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn manager() -> PluginManager {
        PluginManager::new(Arc::new(LocalHost::new()))
    }

    #[test]
    fn duplicate_registration_fails() {
        let mgr = manager();
        mgr.register(Counting::new("A", false)).unwrap();
        let err = mgr.register(Counting::new("A", false)).unwrap_err();
        assert!(err.to_string().contains("already registered"));
        assert_eq!(mgr.names(), vec!["A"]);
    }

    #[test]
    fn invalid_manifest_is_rejected() {
        let mgr = manager();
        assert!(mgr.register(Counting::new("", false)).is_err());
        assert!(mgr.names().is_empty());
    }

    #[tokio::test]
    async fn start_all_continues_past_failures() {
        let mgr = manager();
        let good = Counting::new("Good", false);
        let bad = Counting::new("Bad", true);
        mgr.register(bad.clone()).unwrap();
        mgr.register(good.clone()).unwrap();

        let results = mgr.start_all().await;
        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_err());
        assert!(results[1].1.is_ok());
        assert!(!mgr.is_running("Bad"));
        assert!(mgr.is_running("Good"));
    }

    #[tokio::test]
    async fn start_and_stop_are_idempotent() {
        let mgr = manager();
        let plugin = Counting::new("A", false);
        mgr.register(plugin.clone()).unwrap();

        mgr.start("A").await.unwrap();
        mgr.start("A").await.unwrap();
        assert_eq!(plugin.starts.load(Ordering::SeqCst), 1);

        mgr.stop("A").await.unwrap();
        mgr.stop("A").await.unwrap();
        assert_eq!(plugin.stops.load(Ordering::SeqCst), 1);
        assert!(!mgr.is_running("A"));
    }

    #[tokio::test]
    async fn stop_all_only_stops_running() {
        let mgr = manager();
        let a = Counting::new("A", false);
        let b = Counting::new("B", false);
        mgr.register(a.clone()).unwrap();
        mgr.register(b.clone()).unwrap();
        mgr.start("B").await.unwrap();

        let results = mgr.stop_all().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "B");
        assert_eq!(a.stops.load(Ordering::SeqCst), 0);
        assert_eq!(b.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_plugin_is_not_found() {
        let mgr = manager();
        assert!(matches!(
            mgr.start("missing").await.unwrap_err(),
            PluginError::NotFound(_)
        ));
    }
}
