// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Accepted range for both pitch and rate multipliers.
pub const SPEECH_PARAM_RANGE: RangeInclusive<f32> = 0.5..=2.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("{name} {value} is out of range ({min}..={max})")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Speech parameters applied to every utterance. `1.0` is the engine's
/// normal pitch and rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechSettings {
    pub pitch: f32,
    pub rate: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            pitch: 1.0,
            rate: 1.0,
        }
    }
}

impl SpeechSettings {
    pub fn new(pitch: f32, rate: f32) -> Result<Self, SettingsError> {
        Ok(Self {
            pitch: check_param("pitch", pitch)?,
            rate: check_param("rate", rate)?,
        })
    }

    /// Copy with a new pitch, keeping the rate.
    pub fn with_pitch(self, pitch: f32) -> Result<Self, SettingsError> {
        Self::new(pitch, self.rate)
    }

    /// Copy with a new rate, keeping the pitch.
    pub fn with_rate(self, rate: f32) -> Result<Self, SettingsError> {
        Self::new(self.pitch, rate)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        Self::new(self.pitch, self.rate).map(|_| ())
    }
}

fn check_param(name: &'static str, value: f32) -> Result<f32, SettingsError> {
    // NaN fails `contains`.
    if SPEECH_PARAM_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err(SettingsError::OutOfRange {
            name,
            value,
            min: *SPEECH_PARAM_RANGE.start(),
            max: *SPEECH_PARAM_RANGE.end(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = SpeechSettings::default();
        assert_eq!(s.pitch, 1.0);
        assert_eq!(s.rate, 1.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_with_pitch_keeps_rate() {
        let s = SpeechSettings::new(1.0, 1.5).unwrap().with_pitch(0.5).unwrap();
        assert_eq!(s, SpeechSettings { pitch: 0.5, rate: 1.5 });
    }

    #[test]
    fn test_with_rate_keeps_pitch() {
        let s = SpeechSettings::new(2.0, 1.0).unwrap().with_rate(0.8).unwrap();
        assert_eq!(s, SpeechSettings { pitch: 2.0, rate: 0.8 });
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(SpeechSettings::default().with_pitch(3.0).is_err());
        assert!(SpeechSettings::default().with_rate(0.4).is_err());
        assert!(SpeechSettings::default().with_rate(f32::NAN).is_err());
        assert!(SpeechSettings { pitch: 9.0, rate: 1.0 }.validate().is_err());
    }

    #[test]
    fn test_error_message() {
        let err = SpeechSettings::default().with_pitch(3.0).unwrap_err();
        assert_eq!(err.to_string(), "pitch 3 is out of range (0.5..=2)");
    }
}
