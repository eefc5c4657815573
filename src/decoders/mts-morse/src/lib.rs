// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Text-form Morse code decoder.
//!
//! Input is a string of symbols (`.` and `-`) separated by a single space
//! between letters and `/` between words, e.g. `".- / -..."` decodes to
//! `"A B"`. Decoding is all-or-nothing: the first unknown symbol fails the
//! whole call.

mod encode;
mod table;

use thiserror::Error;

pub use encode::{encode, EncodeError};
pub use table::{lookup, symbols};

/// Separates words in Morse input.
pub const WORD_SEPARATOR: char = '/';
/// Separates letters inside a word.
pub const SYMBOL_SEPARATOR: char = ' ';

const VALID_CHARACTERS_HELP: &str =
    "Use dots (.) and dashes (-). Separate letters with space, words with '/'";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A space/slash-delimited token that is not in the symbol table.
    #[error("Invalid Morse code: {0}")]
    InvalidSymbol(String),
}

/// Decode Morse input into text.
///
/// Empty word-groups and empty symbols are not skipped: `"..//.-"` and `""`
/// both fail with `InvalidSymbol("")`.
pub fn decode(input: &str) -> Result<String, DecodeError> {
    let words = input
        .trim()
        .split(WORD_SEPARATOR)
        .map(decode_word)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(words.join(" "))
}

fn decode_word(word: &str) -> Result<String, DecodeError> {
    let mut out = String::new();
    for symbol in word.trim().split(SYMBOL_SEPARATOR) {
        let symbol = symbol.trim();
        let token =
            lookup(symbol).ok_or_else(|| DecodeError::InvalidSymbol(symbol.to_string()))?;
        out.push_str(token);
    }
    Ok(out)
}

/// Whether `c` may appear in Morse input at all.
pub fn is_valid_char(c: char) -> bool {
    matches!(c, '.' | '-' | SYMBOL_SEPARATOR | WORD_SEPARATOR)
}

/// Cheap character-class check. Passing it does not guarantee [`decode`]
/// succeeds.
pub fn is_valid_input(input: &str) -> bool {
    !input.is_empty() && input.chars().all(is_valid_char)
}

/// Human-readable description of accepted characters and separators.
pub fn describe_valid_characters() -> &'static str {
    VALID_CHARACTERS_HELP
}
