// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod history;
pub mod settings;
pub mod speech;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use history::{ConversionRecord, History};
pub use settings::{SettingsError, SpeechSettings};
pub use speech::SpeakRequest;
