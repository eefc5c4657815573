// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for mts.
//!
//! Config is loaded from the `[mts-cli]` section of `mts-rs.toml`.
//! Default search order:
//! 1. Path specified via `--config` CLI argument
//! 2. `./mts-rs.toml`
//! 3. `~/.config/mts-rs/mts-rs.toml`
//! 4. `/etc/mts-rs/mts-rs.toml`

use std::path::{Path, PathBuf};

use mts_app::{ConfigError, ConfigFile};
use mts_core::SpeechSettings;
use serde::{Deserialize, Serialize};

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Speech engine and initial speech parameters
    pub speech: SpeechConfig,
    /// Session history
    pub history: HistoryConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

/// Which speech engine handles decoded text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechEngineKind {
    /// Log utterances only
    #[default]
    Log,
    /// Run an external text-to-speech program
    Command,
}

/// Speech configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Engine used for speaking
    pub engine: SpeechEngineKind,
    /// Initial pitch multiplier (0.5..=2.0)
    pub pitch: f32,
    /// Initial rate multiplier (0.5..=2.0)
    pub rate: f32,
    /// External program settings (used when engine = "command")
    pub command: CommandConfig,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        let settings = SpeechSettings::default();
        Self {
            engine: SpeechEngineKind::Log,
            pitch: settings.pitch,
            rate: settings.rate,
            command: CommandConfig::default(),
        }
    }
}

/// External text-to-speech program.
///
/// `args` are templates: `{text}` becomes the text to speak, `{pitch}` and
/// `{rate}` become the current multiplier times `base_pitch` / `base_rate`,
/// rounded to an integer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Program to execute
    pub program: String,
    /// Argument templates
    pub args: Vec<String>,
    /// Engine pitch value at multiplier 1.0
    pub base_pitch: f32,
    /// Engine rate value at multiplier 1.0
    pub base_rate: f32,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            program: "espeak-ng".to_string(),
            args: vec![
                "-p".to_string(),
                "{pitch}".to_string(),
                "-s".to_string(),
                "{rate}".to_string(),
                "{text}".to_string(),
            ],
            base_pitch: 50.0,
            base_rate: 175.0,
        }
    }
}

/// History configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of records kept; unbounded when omitted
    pub max_entries: Option<usize>,
}

impl CliConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_log_level(self.general.log_level.as_deref())?;

        SpeechSettings::new(self.speech.pitch, self.speech.rate)
            .map_err(|e| format!("[speech]: {}", e))?;

        if self.speech.engine == SpeechEngineKind::Command {
            let command = &self.speech.command;
            if command.program.trim().is_empty() {
                return Err(
                    "[speech.command].program must be set when [speech].engine = 'command'"
                        .to_string(),
                );
            }
            if !command.args.iter().any(|a| a.contains("{text}")) {
                return Err("[speech.command].args must contain a {text} placeholder".to_string());
            }
            if !(command.base_pitch.is_finite() && command.base_pitch > 0.0) {
                return Err("[speech.command].base_pitch must be > 0".to_string());
            }
            if !(command.base_rate.is_finite() && command.base_rate > 0.0) {
                return Err("[speech.command].base_rate must be > 0".to_string());
            }
        }

        if self.history.max_entries == Some(0) {
            return Err("[history].max_entries must be > 0 when set".to_string());
        }

        Ok(())
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        <Self as ConfigFile>::load_from_file(path)
    }

    /// Load configuration from the default search paths.
    /// Returns default config if no config file is found.
    pub fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        <Self as ConfigFile>::load_from_default_paths()
    }

    /// Generate an example configuration wrapped under the `[mts-cli]`
    /// section header, suitable for use in a combined `mts-rs.toml` file.
    pub fn example_combined_toml() -> String {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(rename = "mts-cli")]
            inner: CliConfig,
        }
        let example = CliConfig {
            general: GeneralConfig {
                log_level: Some("info".to_string()),
            },
            speech: SpeechConfig {
                engine: SpeechEngineKind::Command,
                ..SpeechConfig::default()
            },
            history: HistoryConfig {
                max_entries: Some(100),
            },
        };
        toml::to_string_pretty(&Wrapper { inner: example }).unwrap_or_default()
    }
}

fn validate_log_level(level: Option<&str>) -> Result<(), String> {
    if let Some(level) = level {
        match level {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "[general].log_level '{}' is invalid (expected one of: trace, debug, info, warn, error)",
                    level
                ))
            }
        }
    }
    Ok(())
}

impl ConfigFile for CliConfig {
    fn section_key() -> &'static str {
        "mts-cli"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.general.log_level, None);
        assert_eq!(config.speech.engine, SpeechEngineKind::Log);
        assert_eq!(config.speech.pitch, 1.0);
        assert_eq!(config.speech.rate, 1.0);
        assert_eq!(config.speech.command.program, "espeak-ng");
        assert_eq!(config.speech.command.base_rate, 175.0);
        assert_eq!(config.history.max_entries, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[speech]
engine = "command"
"#;

        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.speech.engine, SpeechEngineKind::Command);
        assert_eq!(config.speech.command.args.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[general]
log_level = "debug"

[speech]
engine = "command"
pitch = 1.5
rate = 0.5

[speech.command]
program = "say"
args = ["-r", "{rate}", "{text}"]
base_pitch = 1.0
base_rate = 200.0

[history]
max_entries = 10
"#;

        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, Some("debug".to_string()));
        assert_eq!(config.speech.pitch, 1.5);
        assert_eq!(config.speech.rate, 0.5);
        assert_eq!(config.speech.command.program, "say");
        assert_eq!(config.speech.command.args, vec!["-r", "{rate}", "{text}"]);
        assert_eq!(config.speech.command.base_rate, 200.0);
        assert_eq!(config.history.max_entries, Some(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_example_combined_toml_parses() {
        let example = CliConfig::example_combined_toml();
        let table: toml::Table = toml::from_str(&example).unwrap();
        let section = toml::to_string(table.get("mts-cli").unwrap()).unwrap();
        let config: CliConfig = toml::from_str(&section).unwrap();
        assert_eq!(config.speech.engine, SpeechEngineKind::Command);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_log_level() {
        let mut config = CliConfig::default();
        config.general.log_level = Some("loud".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_speech() {
        let mut config = CliConfig::default();
        config.speech.pitch = 2.5;
        assert!(config.validate().is_err());

        let mut config = CliConfig::default();
        config.speech.rate = 0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_command_engine() {
        let mut config = CliConfig::default();
        config.speech.engine = SpeechEngineKind::Command;
        config.speech.command.program = "  ".to_string();
        assert!(config.validate().is_err());

        config.speech.command.program = "espeak".to_string();
        config.speech.command.args = vec!["-v".to_string(), "en".to_string()];
        assert!(config.validate().is_err());

        config.speech.command.args.push("{text}".to_string());
        config.speech.command.base_rate = 0.0;
        assert!(config.validate().is_err());

        config.speech.command.base_rate = 175.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_command_settings_ignored_for_log_engine() {
        let mut config = CliConfig::default();
        config.speech.command.program = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_history() {
        let mut config = CliConfig::default();
        config.history.max_entries = Some(0);
        assert!(config.validate().is_err());
    }
}
