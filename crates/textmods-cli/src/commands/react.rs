//! `textmods react` -- run TextReact against a local message.

use std::path::Path;
use std::sync::Arc;

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};

use textmods_plugin::{LocalHost, MessageTarget, PluginManager, RecordedReaction};
use textmods_plugin_textreact::TextReactPlugin;
use textmods_plugin_textreact::types::{MENU_ITEM_ID, MESSAGE_MENU, TextReactConfig};

/// Arguments for `textmods react`.
#[derive(Args)]
pub struct ReactArgs {
    /// Text to react with.
    pub text: String,

    /// Channel the message lives in.
    #[arg(long, default_value = "local")]
    pub channel: String,

    /// Message to react to.
    #[arg(long, default_value = "1")]
    pub message: String,

    /// Reactions already on the message.
    #[arg(long, default_value = "0")]
    pub existing: usize,

    /// Delay between reactions, in milliseconds.
    #[arg(long, default_value = "1000")]
    pub interval_ms: u64,
}

/// Start TextReact on `host`, react once, and return what the host recorded.
pub async fn react_on(
    host: Arc<LocalHost>,
    args: &ReactArgs,
) -> anyhow::Result<Vec<RecordedReaction>> {
    let plugin = Arc::new(TextReactPlugin::new(TextReactConfig {
        interval_ms: args.interval_ms,
        ..TextReactConfig::default()
    }));
    let manager = PluginManager::new(host.clone());
    manager.register(plugin.clone())?;
    for (name, result) in manager.start_all().await {
        if let Err(e) = result {
            anyhow::bail!("failed to start {name}: {e}");
        }
    }

    let target = MessageTarget::new(&args.channel, &args.message, args.existing);
    host.invoke_menu_item(MESSAGE_MENU, MENU_ITEM_ID, &target, &args.text)
        .await?;

    tokio::select! {
        reports = plugin.wait_idle() => {
            let failed: usize = reports.iter().map(|r| r.failed).sum();
            if failed > 0 {
                eprintln!("warning: {failed} reaction(s) failed");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            eprintln!("interrupted, cancelling remaining reactions");
        }
    }

    manager.stop_all().await;
    Ok(host.reactions())
}

pub async fn run(args: ReactArgs, config_dir: Option<&Path>) -> anyhow::Result<()> {
    let host = super::local_host(config_dir);
    let reactions = react_on(host, &args).await?;

    if reactions.is_empty() {
        println!("No reactions added.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["#", "EMOJI", "MESSAGE", "AT"]);
    for (i, reaction) in reactions.iter().enumerate() {
        table.add_row([
            (i + 1).to_string(),
            reaction.emoji.name.clone(),
            format!("{}/{}", reaction.channel_id, reaction.message_id),
            reaction.at.format("%H:%M:%S%.3f").to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: &str, existing: usize) -> ReactArgs {
        ReactArgs {
            text: text.into(),
            channel: "c".into(),
            message: "m".into(),
            existing,
            interval_ms: 1,
        }
    }

    #[tokio::test]
    async fn records_reactions_in_order() {
        let host = Arc::new(LocalHost::new());
        let reactions = react_on(host, &args("ab c", 0)).await.unwrap();
        let names: Vec<_> = reactions.iter().map(|r| r.emoji.name.as_str()).collect();
        assert_eq!(names, vec!["\u{1F170}\u{FE0F}", "\u{1F171}\u{FE0F}", "\u{2B1B}", "\u{1F1E8}"]);
        assert!(reactions.iter().all(|r| r.message_id == "m"));
    }

    #[tokio::test]
    async fn full_message_adds_nothing() {
        let host = Arc::new(LocalHost::new());
        let reactions = react_on(host.clone(), &args("abc", 25)).await.unwrap();
        assert!(reactions.is_empty());
        // plugin was stopped again
        assert!(host.menu_entries(MESSAGE_MENU).is_empty());
    }
}
