//! `textmods encode` -- preview the reactions for a text.

use clap::Args;

use textmods_plugin_textreact::encoder::SymbolEncoder;
use textmods_plugin_textreact::plan_reactions;
use textmods_plugin_textreact::types::TextReactConfig;

/// Arguments for `textmods encode`.
#[derive(Args)]
pub struct EncodeArgs {
    /// Text to spell out.
    pub text: String,

    /// Reactions already on the message.
    #[arg(long, default_value = "0")]
    pub existing: usize,

    /// Print one emoji per line.
    #[arg(long)]
    pub lines: bool,
}

/// Emoji that would be added for `args`.
pub fn symbols_for(args: &EncodeArgs) -> Vec<String> {
    plan_reactions(
        &TextReactConfig::default(),
        &SymbolEncoder::new(),
        args.existing,
        &args.text,
    )
}

pub fn run(args: EncodeArgs) {
    let symbols = symbols_for(&args);
    if symbols.is_empty() {
        println!("(nothing to react with)");
    } else if args.lines {
        for symbol in &symbols {
            println!("{symbol}");
        }
    } else {
        println!("{}", symbols.concat());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: &str, existing: usize) -> EncodeArgs {
        EncodeArgs {
            text: text.into(),
            existing,
            lines: false,
        }
    }

    #[test]
    fn spells_text() {
        assert_eq!(symbols_for(&args("hi", 0)), vec!["\u{1F1ED}", "\u{1F1EE}"]);
    }

    #[test]
    fn honours_existing_reactions() {
        assert_eq!(symbols_for(&args("hello", 19)).len(), 1);
        assert!(symbols_for(&args("hello", 20)).is_empty());
    }
}
