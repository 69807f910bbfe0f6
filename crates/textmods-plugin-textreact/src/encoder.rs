//! Text-to-reaction encoding.
//!
//! Each letter becomes its emoji letter, each space a filler square, and
//! every other character is passed through unchanged. A message can only
//! carry one reaction per emoji, so repeated letters are dropped.

/// One reaction symbol: an emoji sequence, or a passed-through character.
pub type SymbolToken = String;

/// Emoji for `a..=z`. `a`, `b` and `p` use the squared letters (with
/// VS16); the rest are regional indicator symbols.
const LETTER_SYMBOLS: [&str; 26] = [
    "\u{1F170}\u{FE0F}", // a
    "\u{1F171}\u{FE0F}", // b
    "\u{1F1E8}",         // c
    "\u{1F1E9}",         // d
    "\u{1F1EA}",         // e
    "\u{1F1EB}",         // f
    "\u{1F1EC}",         // g
    "\u{1F1ED}",         // h
    "\u{1F1EE}",         // i
    "\u{1F1EF}",         // j
    "\u{1F1F0}",         // k
    "\u{1F1F1}",         // l
    "\u{1F1F2}",         // m
    "\u{1F1F3}",         // n
    "\u{1F1F4}",         // o
    "\u{1F17F}\u{FE0F}", // p
    "\u{1F1F6}",         // q
    "\u{1F1F7}",         // r
    "\u{1F1F8}",         // s
    "\u{1F1F9}",         // t
    "\u{1F1FA}",         // u
    "\u{1F1FB}",         // v
    "\u{1F1FC}",         // w
    "\u{1F1FD}",         // x
    "\u{1F1FE}",         // y
    "\u{1F1FF}",         // z
];

/// Fillers for spaces, in the order they are handed out.
pub const FILLER_SYMBOLS: [&str; 4] = ["\u{2B1B}", "\u{2B1C}", "\u{1F533}", "\u{1F532}"];

/// Fixed mapping from lowercase Latin letters to reaction symbols.
#[derive(Debug, Clone, Copy, Default)]
pub struct LetterSymbolTable;

impl LetterSymbolTable {
    /// Symbol for `c`, or `None` if `c` is not in `a..=z`.
    pub fn lookup(&self, c: char) -> Option<&'static str> {
        c.is_ascii_lowercase()
            .then(|| LETTER_SYMBOLS[(c as u8 - b'a') as usize])
    }
}

/// The filler symbols available to one encoding call.
///
/// Each filler is handed out at most once; the pool is never refilled.
#[derive(Debug, Clone, Default)]
pub struct FillerSymbolPool {
    next: usize,
}

impl FillerSymbolPool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Iterator for FillerSymbolPool {
    type Item = &'static str;

    fn next(&mut self) -> Option<Self::Item> {
        let symbol = *FILLER_SYMBOLS.get(self.next)?;
        self.next += 1;
        Some(symbol)
    }
}

/// Lowercase `input` and drop every repeated non-space character,
/// keeping the first occurrence. Spaces are all kept.
pub fn normalize(input: &str) -> String {
    let mut seen = std::collections::HashSet::new();
    input
        .to_lowercase()
        .chars()
        .filter(|&c| c == ' ' || seen.insert(c))
        .collect()
}

/// Encodes text as a sequence of reaction symbols.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolEncoder {
    letters: LetterSymbolTable,
}

impl SymbolEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `input` into at most `max_symbols` symbols.
    ///
    /// Spaces past the fourth produce nothing; characters outside `a..=z`
    /// are emitted as themselves.
    pub fn encode(&self, input: &str, max_symbols: usize) -> Vec<SymbolToken> {
        let mut fillers = FillerSymbolPool::new();
        let mut symbols = Vec::new();

        for c in normalize(input).chars() {
            if symbols.len() >= max_symbols {
                break;
            }
            if c == ' ' {
                if let Some(filler) = fillers.next() {
                    symbols.push(filler.to_owned());
                }
                continue;
            }
            match self.letters.lookup(c) {
                Some(symbol) => symbols.push(symbol.to_owned()),
                None => symbols.push(c.to_string()),
            }
        }
        symbols
    }
}

/// Encode with the default tables. See [`SymbolEncoder::encode`].
pub fn encode(input: &str, max_symbols: usize) -> Vec<SymbolToken> {
    SymbolEncoder::new().encode(input, max_symbols)
}
