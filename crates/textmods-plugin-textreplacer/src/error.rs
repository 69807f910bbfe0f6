//! Rule-set error types.

use textmods_plugin::PluginError;
use thiserror::Error;

/// Errors produced by rule-set mutations and rule validation.
#[derive(Debug, Error)]
pub enum RuleError {
    /// No rule exists at `index`.
    #[error("rule index {index} out of range (have {len} rules)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Field name not recognised by [`RuleFieldUpdate::parse`](crate::rules::RuleFieldUpdate::parse).
    #[error("unknown rule field '{0}'")]
    UnknownField(String),

    /// Value cannot be assigned to the field.
    #[error("invalid value '{value}' for field '{field}'")]
    InvalidValue { field: String, value: String },

    /// Pattern does not compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Rule set could not be persisted.
    #[error("rule store: {0}")]
    Store(#[from] PluginError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_out_of_range_display() {
        let err = RuleError::IndexOutOfRange { index: 7, len: 4 };
        assert_eq!(err.to_string(), "rule index 7 out of range (have 4 rules)");
    }

    #[test]
    fn invalid_value_display() {
        let err = RuleError::InvalidValue {
            field: "enabled".into(),
            value: "maybe".into(),
        };
        assert_eq!(err.to_string(), "invalid value 'maybe' for field 'enabled'");
    }

    #[test]
    fn from_regex_error() {
        let regex_err = regex::Regex::new("(").unwrap_err();
        let err = RuleError::from(regex_err);
        assert!(matches!(err, RuleError::InvalidPattern(_)));
    }

    #[test]
    fn from_plugin_error() {
        let err = RuleError::from(PluginError::Config("bad key".into()));
        assert!(err.to_string().contains("bad key"));
    }
}
