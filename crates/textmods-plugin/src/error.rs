//! Plugin error types.
//!
//! Defines [`PluginError`], the unified error type for plugin lifecycle,
//! host calls, and configuration persistence.

use thiserror::Error;

/// Errors produced by plugin and host operations.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Plugin failed to start (bad manifest, host refused a patch, etc.).
    #[error("plugin load failed: {0}")]
    LoadFailed(String),

    /// A host call or plugin action failed at runtime.
    #[error("plugin execution failed: {0}")]
    ExecutionFailed(String),

    /// A named plugin, menu item, or patch does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration key or record is unusable.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error during config persistence.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_load_failed() {
        let err = PluginError::LoadFailed("bad manifest".into());
        assert_eq!(err.to_string(), "plugin load failed: bad manifest");
    }

    #[test]
    fn error_display_execution_failed() {
        let err = PluginError::ExecutionFailed("reaction rejected".into());
        assert_eq!(err.to_string(), "plugin execution failed: reaction rejected");
    }

    #[test]
    fn error_display_not_found() {
        let err = PluginError::NotFound("menu item context-TextReact".into());
        assert_eq!(err.to_string(), "not found: menu item context-TextReact");
    }

    #[test]
    fn error_display_config() {
        let err = PluginError::Config("invalid key".into());
        assert_eq!(err.to_string(), "config error: invalid key");
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = PluginError::from(io_err);
        assert!(matches!(err, PluginError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = PluginError::from(json_err);
        assert!(matches!(err, PluginError::Serialization(_)));
    }
}
