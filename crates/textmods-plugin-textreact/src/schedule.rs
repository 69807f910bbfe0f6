//! Staggered reaction submission.
//!
//! The host rate-limits reactions, so symbols are submitted one at a time
//! with a fixed delay between them, on a background task that can be
//! cancelled when the plugin stops.

use std::sync::Arc;
use std::time::Duration;

use textmods_plugin::{CancellationToken, HostBindings, MessageTarget, ReactionEmoji};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::encoder::SymbolToken;
use crate::types::SubmissionReport;

/// Submits reactions on background tasks, spaced by `interval`.
#[derive(Debug, Clone)]
pub struct ReactionScheduler {
    interval: Duration,
    cancel: CancellationToken,
}

impl ReactionScheduler {
    pub fn new(interval: Duration, cancel: CancellationToken) -> Self {
        Self { interval, cancel }
    }

    /// Spawn a task adding `symbols` to `target` in order.
    ///
    /// Symbol `i` is submitted roughly `i * interval` after the call. A
    /// rejected reaction is logged and the rest are still submitted.
    /// Must be called from within a tokio runtime.
    pub fn submit(
        &self,
        host: Arc<dyn HostBindings>,
        target: MessageTarget,
        symbols: Vec<SymbolToken>,
    ) -> JoinHandle<SubmissionReport> {
        let interval = self.interval;
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let mut report = SubmissionReport::default();
            for (i, symbol) in symbols.into_iter().enumerate() {
                if i > 0 {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            report.cancelled = true;
                            break;
                        }
                        _ = tokio::time::sleep(interval) => {}
                    }
                } else if cancel.is_cancelled() {
                    report.cancelled = true;
                    break;
                }

                let emoji = ReactionEmoji::unicode(symbol);
                match host
                    .add_reaction(&target.channel_id, &target.message_id, &emoji)
                    .await
                {
                    Ok(()) => report.submitted += 1,
                    Err(e) => {
                        warn!(
                            channel = %target.channel_id,
                            message = %target.message_id,
                            emoji = %emoji.name,
                            error = %e,
                            "failed to add reaction"
                        );
                        report.failed += 1;
                    }
                }
            }
            debug!(
                message = %target.message_id,
                submitted = report.submitted,
                failed = report.failed,
                cancelled = report.cancelled,
                "reaction submission finished"
            );
            report
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::Value;
    use textmods_plugin::{ContextMenuItem, LocalHost, PatchId, PluginError, SendInterceptor};

    use super::*;

    /// Host that rejects one particular emoji.
    struct Picky {
        reject: &'static str,
        accepted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HostBindings for Picky {
        fn patch_before_send(
            &self,
            _owner: &str,
            _interceptor: Arc<dyn SendInterceptor>,
        ) -> Result<PatchId, PluginError> {
            Ok(0)
        }
        fn unpatch_all(&self, _owner: &str) -> usize {
            0
        }
        async fn add_reaction(
            &self,
            _channel_id: &str,
            _message_id: &str,
            reaction: &ReactionEmoji,
        ) -> Result<(), PluginError> {
            if reaction.name == self.reject {
                return Err(PluginError::ExecutionFailed("unknown emoji".into()));
            }
            self.accepted.lock().push(reaction.name.clone());
            Ok(())
        }
        fn register_context_menu_item(
            &self,
            _owner: &str,
            _item: ContextMenuItem,
        ) -> Result<(), PluginError> {
            Ok(())
        }
        fn unregister_context_menu_items(&self, _owner: &str) -> usize {
            0
        }
        fn load_config(&self, _key: &str) -> Result<Option<Value>, PluginError> {
            Ok(None)
        }
        fn save_config(&self, _key: &str, _value: &Value) -> Result<(), PluginError> {
            Ok(())
        }
    }

    fn symbols(list: &[&str]) -> Vec<SymbolToken> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn submits_in_order() {
        let host = Arc::new(LocalHost::new());
        let scheduler = ReactionScheduler::new(Duration::from_millis(1), CancellationToken::new());

        let report = scheduler
            .submit(host.clone(), MessageTarget::new("c", "m", 0), symbols(&["x", "y", "z"]))
            .await
            .unwrap();

        assert_eq!(report, SubmissionReport { submitted: 3, failed: 0, cancelled: false });
        let names: Vec<String> = host.reactions().into_iter().map(|r| r.emoji.name).collect();
        assert_eq!(names, vec!["x", "y", "z"]);
        assert!(host.reactions().iter().all(|r| r.message_id == "m"));
    }

    #[tokio::test]
    async fn failures_do_not_stop_remaining() {
        let host = Arc::new(Picky {
            reject: "!",
            accepted: Mutex::new(Vec::new()),
        });
        let scheduler = ReactionScheduler::new(Duration::ZERO, CancellationToken::new());

        let report = scheduler
            .submit(host.clone(), MessageTarget::new("c", "m", 0), symbols(&["a", "!", "b"]))
            .await
            .unwrap();

        assert_eq!(report.submitted, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(*host.accepted.lock(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn cancellation_stops_pending_reactions() {
        let host = Arc::new(LocalHost::new());
        let cancel = CancellationToken::new();
        let scheduler = ReactionScheduler::new(Duration::from_secs(60), cancel.clone());

        let handle = scheduler.submit(
            host.clone(),
            MessageTarget::new("c", "m", 0),
            symbols(&["x", "y", "z"]),
        );
        // Let the first reaction go out, then cancel during the long wait.
        while host.reactions().is_empty() {
            tokio::task::yield_now().await;
        }
        cancel.cancel();

        let report = handle.await.unwrap();
        assert!(report.cancelled);
        assert_eq!(report.submitted, 1);
        assert_eq!(host.reactions().len(), 1);
    }

    #[tokio::test]
    async fn already_cancelled_submits_nothing() {
        let host = Arc::new(LocalHost::new());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let scheduler = ReactionScheduler::new(Duration::ZERO, cancel);

        let report = scheduler
            .submit(host.clone(), MessageTarget::new("c", "m", 0), symbols(&["x"]))
            .await
            .unwrap();
        assert!(report.cancelled);
        assert!(host.reactions().is_empty());
    }
}
