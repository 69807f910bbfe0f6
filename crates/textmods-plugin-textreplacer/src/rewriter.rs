//! Sequential rule application.

use std::sync::Arc;

use regex::{Captures, NoExpand, Regex, RegexBuilder};
use textmods_plugin::{OutgoingMessage, SendInterceptor};
use tracing::{debug, warn};

use crate::rules::Rule;
use crate::store::RuleStore;
use crate::template::ReplacementTemplate;

/// Sent instead of a message that would otherwise be blank (U+200B).
pub const EMPTY_MESSAGE_PLACEHOLDER: &str = "\u{200B}";

/// A rule whose pattern and replacement have been parsed.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    regex: Regex,
    template: ReplacementTemplate,
}

impl CompiledRule {
    pub fn compile(rule: &Rule) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&rule.pattern)
            .case_insensitive(rule.case_insensitive)
            .build()?;
        let template = ReplacementTemplate::parse(&rule.replacement, &regex);
        Ok(Self { regex, template })
    }

    /// Replace every non-overlapping match in `text`.
    pub fn apply(&self, text: &str) -> String {
        if let Some(literal) = self.template.as_literal() {
            return self.regex.replace_all(text, NoExpand(literal)).into_owned();
        }
        self.regex
            .replace_all(text, |caps: &Captures<'_>| {
                let mut out = String::new();
                self.template.expand(caps, text, &mut out);
                out
            })
            .into_owned()
    }
}

/// Apply every enabled rule to `message`, in order.
///
/// Each rule sees the previous rule's output. Rules whose pattern does not
/// compile are skipped. A result that is blank after trimming is replaced
/// by [`EMPTY_MESSAGE_PLACEHOLDER`].
pub fn rewrite(message: &str, rules: &[Rule]) -> String {
    let mut result = message.to_owned();
    for (index, rule) in rules.iter().enumerate() {
        if !rule.enabled {
            continue;
        }
        match CompiledRule::compile(rule) {
            Ok(compiled) => result = compiled.apply(&result),
            Err(e) => {
                warn!(index, rule = %rule.name, error = %e, "skipping rule with invalid pattern");
            }
        }
    }

    if result.trim().is_empty() {
        return EMPTY_MESSAGE_PLACEHOLDER.to_owned();
    }
    result
}

/// Rewrites outgoing messages with the rules currently in a [`RuleStore`].
///
/// Rules are read from the store on every message, so edits take effect
/// on the next send.
pub struct RuleRewriter {
    store: Arc<RuleStore>,
}

impl RuleRewriter {
    pub fn new(store: Arc<RuleStore>) -> Self {
        Self { store }
    }

    pub fn rewrite(&self, message: &str) -> String {
        rewrite(message, &self.store.load_rules())
    }
}

impl SendInterceptor for RuleRewriter {
    fn before_send(&self, message: &mut OutgoingMessage) {
        let rewritten = self.rewrite(&message.content);
        if rewritten != message.content {
            debug!(channel = %message.channel_id, "rewrote outgoing message");
            message.content = rewritten;
        }
    }
}
