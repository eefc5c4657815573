// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use thiserror::Error;

use crate::table::reverse_lookup;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("Character has no Morse symbol: {0:?}")]
    UnsupportedCharacter(char),
}

/// Encode text into Morse, letters separated by a space and words by `" / "`.
///
/// Letters are matched case-insensitively. Runs of whitespace count as one
/// word break.
pub fn encode(text: &str) -> Result<String, EncodeError> {
    let mut words = Vec::new();
    for word in text.split_whitespace() {
        let symbols = word
            .chars()
            .map(|c| {
                reverse_lookup(c.to_ascii_uppercase()).ok_or(EncodeError::UnsupportedCharacter(c))
            })
            .collect::<Result<Vec<_>, _>>()?;
        words.push(symbols.join(" "));
    }
    Ok(words.join(" / "))
}
