//! `textmods rewrite` -- send a message through TextReplacer.

use std::path::Path;
use std::sync::Arc;

use clap::Args;

use textmods_plugin::{LocalHost, OutgoingMessage, Plugin};
use textmods_plugin_textreplacer::TextReplacerPlugin;

/// Arguments for `textmods rewrite`.
#[derive(Args)]
pub struct RewriteArgs {
    /// Message text.
    pub message: String,

    /// Channel the message is sent to.
    #[arg(long, default_value = "local")]
    pub channel: String,
}

/// Send `message` through TextReplacer on `host` and return what would go
/// out on the wire.
pub async fn rewrite_on(host: Arc<LocalHost>, args: &RewriteArgs) -> anyhow::Result<String> {
    let plugin = TextReplacerPlugin::new();
    plugin.start(host.clone()).await?;
    let sent = host.send_message(OutgoingMessage::new(&args.channel, &args.message));
    plugin.stop(host).await?;
    Ok(sent.content)
}

pub async fn run(args: RewriteArgs, config_dir: Option<&Path>) -> anyhow::Result<()> {
    let host = super::local_host(config_dir);
    let content = rewrite_on(host, &args).await?;
    println!("{content}");
    Ok(())
}
