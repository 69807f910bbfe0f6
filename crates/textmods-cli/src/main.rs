//! `textmods` -- CLI for the textmods chat plugins.
//!
//! Runs the plugins against an in-process host so they can be tried and
//! configured from a terminal:
//!
//! - `textmods encode` -- Show the emoji a text would be spelled with.
//! - `textmods react` -- Run TextReact on a message and print the reactions.
//! - `textmods rewrite` -- Send a message through TextReplacer.
//! - `textmods rules` -- List and edit the TextReplacer rules.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

/// textmods plugin CLI.
#[derive(Parser)]
#[command(name = "textmods", about = "textmods plugin CLI", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config directory (overrides TEXTMODS_CONFIG_DIR and ~/.textmods/config).
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show the reaction emoji for a text.
    Encode(commands::encode::EncodeArgs),

    /// React to a message with a text, one emoji at a time.
    React(commands::react::ReactArgs),

    /// Rewrite a message with the current rules.
    Rewrite(commands::rewrite::RewriteArgs),

    /// Manage TextReplacer rules.
    Rules {
        #[command(subcommand)]
        action: RulesCmd,
    },
}

/// Subcommands for `textmods rules`.
#[derive(Subcommand)]
enum RulesCmd {
    /// List rules in application order.
    List {
        /// Print the raw settings record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Append a rule.
    Add {
        /// Display name.
        #[arg(long, default_value = "")]
        name: String,

        /// Regular expression to match.
        #[arg(long)]
        pattern: String,

        /// Replacement text (`$1`, `$<name>`, `$&` tokens allowed).
        #[arg(long)]
        replacement: String,

        /// Add the rule disabled.
        #[arg(long)]
        disabled: bool,

        /// Match case-insensitively.
        #[arg(short = 'i', long)]
        case_insensitive: bool,
    },

    /// Change one field of a rule.
    Update {
        /// Zero-based rule index.
        index: usize,

        /// Field name (name, pattern, replacement, enabled, caseInsensitive).
        field: String,

        /// New value.
        value: String,
    },

    /// Delete a rule.
    Delete {
        /// Zero-based rule index.
        index: usize,
    },

    /// Restore the default rules.
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_dir = cli.config_dir.as_deref();

    match cli.command {
        Commands::Encode(args) => commands::encode::run(args),
        Commands::React(args) => commands::react::run(args, config_dir).await?,
        Commands::Rewrite(args) => commands::rewrite::run(args, config_dir).await?,
        Commands::Rules { action } => {
            let store = commands::rule_store(config_dir);
            match action {
                RulesCmd::List { json } => commands::rules_cmd::rules_list(&store, json)?,
                RulesCmd::Add {
                    name,
                    pattern,
                    replacement,
                    disabled,
                    case_insensitive,
                } => commands::rules_cmd::rules_add(
                    &store,
                    name,
                    pattern,
                    replacement,
                    !disabled,
                    case_insensitive,
                )?,
                RulesCmd::Update {
                    index,
                    field,
                    value,
                } => commands::rules_cmd::rules_update(&store, index, &field, &value)?,
                RulesCmd::Delete { index } => commands::rules_cmd::rules_delete(&store, index)?,
                RulesCmd::Reset => commands::rules_cmd::rules_reset(&store)?,
            }
        }
    }

    Ok(())
}
