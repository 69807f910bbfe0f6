//! Persistent rule set.
//!
//! Rules live under one config key as `{"regexes": [...]}`. Every
//! mutation is a load, modify, save cycle under a write lock, so readers
//! never observe a half-applied change.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use textmods_plugin::{ConfigStore, HostBindings, HostConfigStore, PluginError};
use tracing::{debug, info, warn};

use crate::error::RuleError;
use crate::rules::{ReplacerSettings, Rule, RuleFieldUpdate, RuleSet, default_rules};

/// Config key the settings record is stored under.
pub const SETTINGS_KEY: &str = "settings";

/// Namespace used when the store is backed by a host.
pub const PLUGIN_NAME: &str = "TextReplacer";

/// The rule set, backed by a [`ConfigStore`].
pub struct RuleStore {
    store: Arc<dyn ConfigStore>,
    lock: RwLock<()>,
}

impl RuleStore {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            store,
            lock: RwLock::new(()),
        }
    }

    /// A store that keeps its record in the host config, namespaced
    /// under [`PLUGIN_NAME`].
    pub fn for_host(host: Arc<dyn HostBindings>) -> Self {
        Self::new(Arc::new(HostConfigStore::new(host, PLUGIN_NAME)))
    }

    /// The persisted rule set, or the defaults if nothing usable is stored.
    pub fn load_rules(&self) -> RuleSet {
        let _guard = self.lock.read();
        match self.current() {
            Ok(rules) => rules,
            Err(e) => {
                warn!(error = %e, "failed to load rules, using defaults");
                default_rules()
            }
        }
    }

    /// Append `rule` and persist.
    pub fn add_rule(&self, rule: Rule) -> Result<RuleSet, RuleError> {
        self.mutate(|rules| {
            debug!(name = %rule.name, "adding rule");
            rules.push(rule);
            Ok(())
        })
    }

    /// Replace one field of the rule at `index` and persist.
    pub fn update_rule_field(
        &self,
        index: usize,
        update: RuleFieldUpdate,
    ) -> Result<RuleSet, RuleError> {
        self.mutate(|rules| {
            let len = rules.len();
            let rule = rules
                .get_mut(index)
                .ok_or(RuleError::IndexOutOfRange { index, len })?;
            debug!(index, field = %update.field(), "updating rule");
            update.apply(rule);
            Ok(())
        })
    }

    /// Remove the rule at `index` and persist. Later rules shift down.
    pub fn delete_rule(&self, index: usize) -> Result<RuleSet, RuleError> {
        self.mutate(|rules| {
            if index >= rules.len() {
                return Err(RuleError::IndexOutOfRange {
                    index,
                    len: rules.len(),
                });
            }
            let removed = rules.remove(index);
            debug!(index, name = %removed.name, "deleted rule");
            Ok(())
        })
    }

    /// Replace the stored set with the defaults.
    pub fn reset_rules(&self) -> Result<RuleSet, RuleError> {
        let _guard = self.lock.write();
        let rules = default_rules();
        self.persist(&rules)?;
        info!("rules reset to defaults");
        Ok(rules)
    }

    fn mutate<F>(&self, f: F) -> Result<RuleSet, RuleError>
    where
        F: FnOnce(&mut RuleSet) -> Result<(), RuleError>,
    {
        let _guard = self.lock.write();
        let mut rules = self.current()?;
        f(&mut rules)?;
        self.persist(&rules)?;
        Ok(rules)
    }

    /// Read the record. Callers hold the lock.
    fn current(&self) -> Result<RuleSet, RuleError> {
        let value = match self.store.load(SETTINGS_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(default_rules()),
            Err(PluginError::Serialization(e)) => {
                warn!(error = %e, "stored rules are not valid JSON, using defaults");
                return Ok(default_rules());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(parse_settings(value))
    }

    fn persist(&self, rules: &RuleSet) -> Result<(), RuleError> {
        let record = ReplacerSettings {
            regexes: rules.clone(),
        };
        let value = serde_json::to_value(&record).map_err(PluginError::from)?;
        self.store.save(SETTINGS_KEY, &value)?;
        Ok(())
    }
}

/// Read the rules out of a stored record.
///
/// Entries are parsed one at a time: a malformed entry is dropped and
/// logged, the rest survive. Only a record with no usable `regexes` array
/// falls back to the defaults.
fn parse_settings(value: Value) -> RuleSet {
    let Value::Object(mut record) = value else {
        warn!("stored rules record is not an object, using defaults");
        return default_rules();
    };
    let Some(Value::Array(entries)) = record.remove("regexes") else {
        warn!("stored rules record has no regexes list, using defaults");
        return default_rules();
    };

    let mut rules = RuleSet::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Rule>(entry) {
            Ok(rule) => rules.push(rule),
            Err(e) => warn!(index, error = %e, "dropping malformed stored rule"),
        }
    }
    rules
}
