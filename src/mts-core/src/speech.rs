// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use tokio::sync::oneshot;

/// Request sent to the speech task.
///
/// `done` fires once the utterance has finished, been flushed by a newer
/// request, or failed to start.
#[derive(Debug)]
pub struct SpeakRequest {
    pub text: String,
    pub done: Option<oneshot::Sender<()>>,
}

impl SpeakRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: None,
        }
    }

    /// Request plus a receiver that resolves when speaking is over.
    pub fn with_completion(text: impl Into<String>) -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                text: text.into(),
                done: Some(tx),
            },
            rx,
        )
    }
}
