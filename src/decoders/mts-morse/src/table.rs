// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Morse symbol table.

use std::collections::HashMap;
use std::sync::OnceLock;

// Letters, digits, basic punctuation and the SOS prosign.
const MORSE_TABLE: [(&str, &str); 41] = [
    (".-", "A"),
    ("-...", "B"),
    ("-.-.", "C"),
    ("-..", "D"),
    (".", "E"),
    ("..-.", "F"),
    ("--.", "G"),
    ("....", "H"),
    ("..", "I"),
    (".---", "J"),
    ("-.-", "K"),
    (".-..", "L"),
    ("--", "M"),
    ("-.", "N"),
    ("---", "O"),
    (".--.", "P"),
    ("--.-", "Q"),
    (".-.", "R"),
    ("...", "S"),
    ("-", "T"),
    ("..-", "U"),
    ("...-", "V"),
    (".--", "W"),
    ("-..-", "X"),
    ("-.--", "Y"),
    ("--..", "Z"),
    (".----", "1"),
    ("..---", "2"),
    ("...--", "3"),
    ("....-", "4"),
    (".....", "5"),
    ("-....", "6"),
    ("--...", "7"),
    ("---..", "8"),
    ("----.", "9"),
    ("-----", "0"),
    (".-.-.-", "."),
    ("--..--", ","),
    ("..--..", "?"),
    ("-.-.--", "!"),
    ("...---...", "SOS"),
];

fn decode_map() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| MORSE_TABLE.iter().copied().collect())
}

fn encode_map() -> &'static HashMap<char, &'static str> {
    static MAP: OnceLock<HashMap<char, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| {
        MORSE_TABLE
            .iter()
            .filter_map(|&(symbol, token)| {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some((c, symbol)),
                    _ => None,
                }
            })
            .collect()
    })
}

/// Look up the token for a single Morse symbol.
pub fn lookup(symbol: &str) -> Option<&'static str> {
    decode_map().get(symbol).copied()
}

/// Look up the Morse symbol for a single character. Letters must be uppercase.
pub fn reverse_lookup(c: char) -> Option<&'static str> {
    encode_map().get(&c).copied()
}

/// Iterate over every `(symbol, token)` pair in table order.
pub fn symbols() -> impl Iterator<Item = (&'static str, &'static str)> {
    MORSE_TABLE.iter().copied()
}
