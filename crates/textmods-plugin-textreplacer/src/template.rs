//! Replacement templates.
//!
//! Stored rules use `$`-token replacements:
//!
//! | Token | Expands to |
//! |-------|------------|
//! | `$$` | a literal `$` |
//! | `$&` | the whole match |
//! | `` $` `` | the text before the match |
//! | `$'` | the text after the match |
//! | `$n`, `$nn` | capture group 1..=99 |
//! | `$<name>` | named capture group |
//!
//! A numbered token naming a group the pattern does not have stays
//! literal; `$12` with a single group reads as group 1 followed by `2`.
//! `$<name>` stays literal when the pattern has no named groups at all.
//! A group that exists but did not take part in the match expands to
//! nothing.
//!
//! This differs from `regex::Captures::expand` (where `$1a` names the
//! group `1a`), so templates are parsed here once per compiled rule.

use regex::{Captures, Regex};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Group(usize),
    Named(String),
    Match,
    Before,
    After,
}

/// A parsed replacement string, bound to one pattern's groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementTemplate {
    pieces: Vec<Piece>,
}

impl ReplacementTemplate {
    /// Parse `template` against the groups of `regex`.
    pub fn parse(template: &str, regex: &Regex) -> Self {
        let group_count = regex.captures_len() - 1;
        let has_named = regex.capture_names().flatten().next().is_some();

        let mut pieces = Vec::new();
        let mut rest = template;
        while let Some(pos) = rest.find('$') {
            push_literal(&mut pieces, &rest[..pos]);
            let (piece, consumed) = parse_token(&rest[pos..], group_count, has_named);
            match piece {
                Piece::Literal(text) => push_literal(&mut pieces, &text),
                other => pieces.push(other),
            }
            rest = &rest[pos + consumed..];
        }
        push_literal(&mut pieces, rest);

        Self { pieces }
    }

    /// The template text, if it contains no tokens.
    pub fn as_literal(&self) -> Option<&str> {
        match self.pieces.as_slice() {
            [] => Some(""),
            [Piece::Literal(text)] => Some(text.as_str()),
            _ => None,
        }
    }

    /// Append the expansion for one match of `haystack` to `dst`.
    pub fn expand(&self, caps: &Captures<'_>, haystack: &str, dst: &mut String) {
        let whole = caps.get(0);
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => dst.push_str(text),
                Piece::Group(n) => {
                    if let Some(m) = caps.get(*n) {
                        dst.push_str(m.as_str());
                    }
                }
                Piece::Named(name) => {
                    if let Some(m) = caps.name(name) {
                        dst.push_str(m.as_str());
                    }
                }
                Piece::Match => {
                    if let Some(m) = whole {
                        dst.push_str(m.as_str());
                    }
                }
                Piece::Before => {
                    if let Some(m) = whole {
                        dst.push_str(&haystack[..m.start()]);
                    }
                }
                Piece::After => {
                    if let Some(m) = whole {
                        dst.push_str(&haystack[m.end()..]);
                    }
                }
            }
        }
    }
}

fn push_literal(pieces: &mut Vec<Piece>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Piece::Literal(last)) = pieces.last_mut() {
        last.push_str(text);
    } else {
        pieces.push(Piece::Literal(text.to_owned()));
    }
}

/// Parse the token at the start of `rest` (which begins with `$`).
/// Returns the piece and how many bytes it consumed.
fn parse_token(rest: &str, group_count: usize, has_named: bool) -> (Piece, usize) {
    let bytes = rest.as_bytes();
    let dollar = || (Piece::Literal("$".into()), 1);

    match bytes.get(1) {
        Some(b'$') => (Piece::Literal("$".into()), 2),
        Some(b'&') => (Piece::Match, 2),
        Some(b'`') => (Piece::Before, 2),
        Some(b'\'') => (Piece::After, 2),
        Some(d) if d.is_ascii_digit() => {
            let first = usize::from(d - b'0');
            if let Some(d2) = bytes.get(2).filter(|b| b.is_ascii_digit()) {
                let two = first * 10 + usize::from(d2 - b'0');
                if (1..=group_count).contains(&two) {
                    return (Piece::Group(two), 3);
                }
            }
            if (1..=group_count).contains(&first) {
                (Piece::Group(first), 2)
            } else {
                dollar()
            }
        }
        Some(b'<') if has_named => match rest[2..].find('>') {
            Some(end) => (Piece::Named(rest[2..2 + end].to_owned()), 3 + end),
            None => dollar(),
        },
        _ => dollar(),
    }
}
