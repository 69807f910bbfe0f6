//! Message and reaction types exchanged with the host.

use serde::{Deserialize, Serialize};

/// A message the user is about to send.
///
/// Send interceptors receive this by mutable reference and may rewrite
/// `content` in place before the host transmits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Channel the message is being sent to.
    pub channel_id: String,

    /// Message text.
    pub content: String,
}

impl OutgoingMessage {
    /// Create an outgoing message for a channel.
    pub fn new(channel_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            content: content.into(),
        }
    }
}

/// The message a context-menu action was opened on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTarget {
    /// Channel containing the message.
    pub channel_id: String,

    /// Message identifier.
    pub message_id: String,

    /// Number of distinct reactions already on the message.
    #[serde(default)]
    pub reaction_count: usize,
}

impl MessageTarget {
    pub fn new(
        channel_id: impl Into<String>,
        message_id: impl Into<String>,
        reaction_count: usize,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
            reaction_count,
        }
    }
}

/// A reaction as accepted by the host's reaction API.
///
/// Unicode emoji have no `id`; custom emoji carry the host's emoji id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEmoji {
    /// Custom emoji id, `None` for unicode emoji.
    pub id: Option<String>,

    /// Emoji text (the unicode sequence for unicode emoji).
    pub name: String,

    /// Whether the emoji is animated.
    #[serde(default)]
    pub animated: bool,
}

impl ReactionEmoji {
    /// A non-animated unicode emoji reaction.
    pub fn unicode(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            animated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unicode_reaction_has_no_id() {
        let emoji = ReactionEmoji::unicode("🇭");
        assert!(emoji.id.is_none());
        assert_eq!(emoji.name, "🇭");
        assert!(!emoji.animated);
    }

    #[test]
    fn reaction_serializes_null_id() {
        let json = serde_json::to_value(ReactionEmoji::unicode("⬛")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": null, "name": "⬛", "animated": false})
        );
    }

    #[test]
    fn message_target_defaults_reaction_count() {
        let target: MessageTarget =
            serde_json::from_str(r#"{"channel_id":"c1","message_id":"m1"}"#).unwrap();
        assert_eq!(target, MessageTarget::new("c1", "m1", 0));
    }

    #[test]
    fn message_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OutgoingMessage>();
        assert_send_sync::<MessageTarget>();
        assert_send_sync::<ReactionEmoji>();
    }
}
