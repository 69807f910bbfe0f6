//! TextReplacer driven end-to-end through `LocalHost`.

use std::sync::Arc;

use textmods_plugin::{
    FileConfigStore, HostBindings, LocalHost, OutgoingMessage, Plugin, PluginManager,
};
use textmods_plugin_textreplacer::{
    EMPTY_MESSAGE_PLACEHOLDER, Rule, RuleFieldUpdate, TextReplacerPlugin,
};

fn send(host: &LocalHost, content: &str) -> String {
    host.send_message(OutgoingMessage::new("chan", content)).content
}

#[tokio::test]
async fn rewrites_outgoing_messages() {
    let host = Arc::new(LocalHost::new());
    let plugin = TextReplacerPlugin::new();
    plugin.start(host.clone()).await.unwrap();

    assert_eq!(host.patch_count(), 1);
    assert_eq!(send(&host, "look https://x.com/a"), "look https://vxtwitter.com/a");
    assert_eq!(send(&host, "pixiv.net/artworks/1"), "phixiv.net/artworks/1");
    assert_eq!(send(&host, "nothing to see"), "nothing to see");
    assert_eq!(send(&host, "  "), EMPTY_MESSAGE_PLACEHOLDER);
}

#[tokio::test]
async fn edits_apply_to_next_message() {
    let host = Arc::new(LocalHost::new());
    let plugin = TextReplacerPlugin::new();
    plugin.start(host.clone()).await.unwrap();
    let settings = plugin.settings().unwrap();

    settings
        .update_rule_field(0, RuleFieldUpdate::Enabled(false))
        .unwrap();
    assert_eq!(send(&host, "//x.com"), "//x.com");

    settings
        .add_rule(Rule::new("shout", "hello", "HELLO").ignoring_case())
        .unwrap();
    assert_eq!(send(&host, "Hello there"), "HELLO there");
}

#[tokio::test]
async fn settings_are_namespaced_in_host_config() {
    let host = Arc::new(LocalHost::new());
    let plugin = TextReplacerPlugin::new();
    plugin.start(host.clone()).await.unwrap();

    plugin.settings().unwrap().delete_rule(3).unwrap();

    let record = host.load_config("TextReplacer.settings").unwrap().unwrap();
    assert_eq!(record["regexes"].as_array().unwrap().len(), 3);
    assert!(host.load_config("settings").unwrap().is_none());
}

#[tokio::test]
async fn stop_removes_patch() {
    let host = Arc::new(LocalHost::new());
    let plugin = TextReplacerPlugin::new();
    plugin.start(host.clone()).await.unwrap();
    plugin.stop(host.clone()).await.unwrap();

    assert_eq!(host.patch_count(), 0);
    assert_eq!(send(&host, "//x.com"), "//x.com");
}

#[tokio::test]
async fn double_start_does_not_stack_patches() {
    let host = Arc::new(LocalHost::new());
    let plugin = TextReplacerPlugin::new();
    plugin.start(host.clone()).await.unwrap();
    plugin
        .settings()
        .unwrap()
        .add_rule(Rule::new("double", "a", "aa"))
        .unwrap();

    assert!(plugin.start(host.clone()).await.is_err());
    assert_eq!(host.patch_count(), 1);
    assert_eq!(send(&host, "a"), "aa");

    plugin.stop(host.clone()).await.unwrap();
    plugin.start(host.clone()).await.unwrap();
    assert_eq!(host.patch_count(), 1);
}

#[tokio::test]
async fn rules_persist_across_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();

    {
        let host = Arc::new(LocalHost::with_config_store(Arc::new(
            FileConfigStore::with_dir(dir.path()),
        )));
        let plugin = TextReplacerPlugin::new();
        plugin.start(host.clone()).await.unwrap();
        plugin
            .settings()
            .unwrap()
            .add_rule(Rule::new("cats", "cat", "dog"))
            .unwrap();
        plugin.stop(host).await.unwrap();
    }

    assert!(dir.path().join("TextReplacer.settings.json").exists());

    let host = Arc::new(LocalHost::with_config_store(Arc::new(
        FileConfigStore::with_dir(dir.path()),
    )));
    let plugin = TextReplacerPlugin::new();
    plugin.start(host.clone()).await.unwrap();
    assert_eq!(send(&host, "my cat"), "my dog");
}

#[tokio::test]
async fn runs_under_plugin_manager() {
    let host = Arc::new(LocalHost::new());
    let manager = PluginManager::new(host.clone());
    manager
        .register(Arc::new(TextReplacerPlugin::new()))
        .unwrap();

    let results = manager.start_all().await;
    assert!(results.iter().all(|(_, r)| r.is_ok()));
    assert!(manager.is_running("TextReplacer"));
    assert_eq!(send(&host, "//twitter.com/x"), "//vxtwitter.com/x");

    manager.stop_all().await;
    assert_eq!(host.patch_count(), 0);
}
