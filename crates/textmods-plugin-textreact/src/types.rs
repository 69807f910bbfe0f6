//! Types for the TextReact plugin.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Context-menu item id.
pub const MENU_ITEM_ID: &str = "context-TextReact";

/// Context-menu item label.
pub const MENU_ITEM_LABEL: &str = "Text React";

/// Host menu the item is added to.
pub const MESSAGE_MENU: &str = "message";

/// Configuration for TextReact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextReactConfig {
    /// Most reactions a single message may carry on the host.
    #[serde(default = "default_max_reactions")]
    pub max_reactions: usize,

    /// Delay between consecutive reaction submissions, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_max_reactions() -> usize {
    20
}

fn default_interval_ms() -> u64 {
    1000
}

impl Default for TextReactConfig {
    fn default() -> Self {
        Self {
            max_reactions: default_max_reactions(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl TextReactConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// How many more reactions a message with `reaction_count` reactions
    /// can take.
    pub fn capacity_remaining(&self, reaction_count: usize) -> usize {
        self.max_reactions.saturating_sub(reaction_count)
    }
}

/// Outcome of one staggered submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReport {
    /// Reactions the host accepted.
    pub submitted: usize,

    /// Reactions the host rejected.
    pub failed: usize,

    /// Whether the submission was cancelled before finishing.
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = TextReactConfig::default();
        assert_eq!(config.max_reactions, 20);
        assert_eq!(config.interval(), Duration::from_secs(1));
    }

    #[test]
    fn config_serde_fills_defaults() {
        let config: TextReactConfig = serde_json::from_str(r#"{"interval_ms": 5}"#).unwrap();
        assert_eq!(config.max_reactions, 20);
        assert_eq!(config.interval_ms, 5);
    }

    #[test]
    fn capacity_never_negative() {
        let config = TextReactConfig::default();
        assert_eq!(config.capacity_remaining(0), 20);
        assert_eq!(config.capacity_remaining(17), 3);
        assert_eq!(config.capacity_remaining(20), 0);
        assert_eq!(config.capacity_remaining(25), 0);
    }
}
