//! Plugin and host trait definitions for textmods.
//!
//! This crate defines the contract between textmods plugins and the chat
//! client that hosts them. Plugins never reach into the host directly;
//! everything they need goes through [`HostBindings`].
//!
//! # Trait Overview
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Plugin`] | Lifecycle (`start`/`stop`) and metadata of a plugin |
//! | [`HostBindings`] | Host services: send patches, reactions, menus, config |
//! | [`SendInterceptor`] | Synchronous hook run before a message is sent |
//! | [`MenuAction`] | Handler behind a context-menu item |
//! | [`ConfigStore`] | Persisted per-key JSON configuration |
//!
//! # Implementations
//!
//! - [`LocalHost`] -- in-process host used by tests and the CLI.
//! - [`MemoryConfigStore`] / [`FileConfigStore`] -- config backends.
//! - [`HostConfigStore`] -- exposes a host's config API as a [`ConfigStore`].
//! - [`PluginManager`] -- starts and stops a set of plugins on one host.

pub mod error;
pub mod lifecycle;
pub mod local;
pub mod manifest;
pub mod message;
pub mod store;
pub mod traits;

// Re-export core types at crate root for convenience.
pub use error::PluginError;
pub use lifecycle::PluginManager;
pub use local::{LocalHost, MenuEntry, RecordedReaction};
pub use manifest::PluginManifest;
pub use message::{MessageTarget, OutgoingMessage, ReactionEmoji};
pub use store::{FileConfigStore, HostConfigStore, MemoryConfigStore};
pub use traits::{
    CancellationToken, ConfigStore, ContextMenuItem, HostBindings, MenuAction, PatchId, Plugin,
    SendInterceptor,
};
