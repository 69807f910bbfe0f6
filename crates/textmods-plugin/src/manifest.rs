//! Plugin manifest.
//!
//! Defines [`PluginManifest`], the metadata block every plugin carries
//! (name, author, version, description, source URL).

use serde::{Deserialize, Serialize};

use crate::PluginError;

/// Plugin metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Plugin name; also the namespace for the plugin's config keys.
    pub name: String,

    /// Author display name.
    pub author: String,

    /// Version string. Two-part versions (`1.2`) are accepted.
    pub version: String,

    /// One-line description shown in the host's plugin list.
    #[serde(default)]
    pub description: String,

    /// Where the plugin's source lives.
    #[serde(default)]
    pub source: Option<String>,
}

impl PluginManifest {
    /// Validate the manifest. Returns an error describing the first
    /// validation failure, or `Ok(())` if the manifest is valid.
    pub fn validate(&self) -> Result<(), PluginError> {
        if self.name.is_empty() {
            return Err(PluginError::LoadFailed("manifest: name is required".into()));
        }
        if self.name.contains(|c: char| c.is_whitespace() || c == '/' || c == '\\') {
            return Err(PluginError::LoadFailed(format!(
                "manifest: name '{}' must not contain whitespace or path separators",
                self.name
            )));
        }
        self.semver()?;
        Ok(())
    }

    /// Parse the version, padding `major.minor` to `major.minor.0`.
    pub fn semver(&self) -> Result<semver::Version, PluginError> {
        let padded;
        let raw = if self.version.matches('.').count() == 1 {
            padded = format!("{}.0", self.version);
            padded.as_str()
        } else {
            self.version.as_str()
        };
        semver::Version::parse(raw).map_err(|_| {
            PluginError::LoadFailed(format!(
                "manifest: invalid semver version '{}'",
                self.version
            ))
        })
    }
}
