// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! In-memory conversion history for one session.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// One successful Morse-to-text conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// Morse input as typed
    pub morse: String,
    /// Decoded text
    pub text: String,
    /// Creation time, milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl ConversionRecord {
    pub fn new(morse: impl Into<String>, text: impl Into<String>) -> Self {
        let timestamp_ms = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => u64::try_from(d.as_millis()).unwrap_or(u64::MAX),
            Err(_) => 0,
        };
        Self {
            morse: morse.into(),
            text: text.into(),
            timestamp_ms,
        }
    }
}

/// Most-recent-first list of conversions.
///
/// Records are never edited once added. With a `max_entries` cap, adding past
/// the cap drops the oldest record. A cap of zero means no cap.
#[derive(Debug, Clone, Default)]
pub struct History {
    records: VecDeque<ConversionRecord>,
    max_entries: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` and `Some(0)` both keep every record.
    pub fn with_max_entries(max_entries: Option<usize>) -> Self {
        Self {
            records: VecDeque::new(),
            max_entries: max_entries.filter(|&max| max > 0),
        }
    }

    /// Record a conversion at the front of the list and return it.
    pub fn add(&mut self, morse: impl Into<String>, text: impl Into<String>) -> &ConversionRecord {
        self.push(ConversionRecord::new(morse, text))
    }

    pub fn push(&mut self, record: ConversionRecord) -> &ConversionRecord {
        self.records.push_front(record);
        if let Some(max) = self.max_entries {
            self.records.truncate(max);
        }
        &self.records[0]
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Record at `index`, where 0 is the newest.
    pub fn get(&self, index: usize) -> Option<&ConversionRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
