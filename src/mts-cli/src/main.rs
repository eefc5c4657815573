// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

mod commands;
mod config;
mod session;
mod speech;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use mts_app::init_logging;
use mts_core::{DynResult, History, SpeakRequest, SpeechSettings};

use config::{CliConfig, SpeechEngineKind};
use session::Session;
use speech::SpeechEngine;

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - Morse code to speech");
const SPEECH_CHANNEL_BUFFER: usize = 8;

#[derive(Debug, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION,
)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
    /// Speech engine to use
    #[arg(short = 'e', long = "engine", value_enum)]
    engine: Option<EngineKind>,
    /// Initial pitch multiplier (0.5..2.0)
    #[arg(short = 'p', long = "pitch")]
    pitch: Option<f32>,
    /// Initial speech rate multiplier (0.5..2.0)
    #[arg(short = 'r', long = "rate")]
    rate: Option<f32>,
    /// Decode only, do not speak
    #[arg(long = "no-speak")]
    no_speak: bool,
    /// Morse to decode once; starts an interactive session when omitted
    #[arg(value_name = "MORSE", allow_hyphen_values = true)]
    morse: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineKind {
    Log,
    Command,
}

/// Merge CLI overrides into the loaded configuration.
fn apply_cli_overrides(cli: &Cli, cfg: &mut CliConfig) {
    if let Some(engine) = cli.engine {
        cfg.speech.engine = match engine {
            EngineKind::Log => SpeechEngineKind::Log,
            EngineKind::Command => SpeechEngineKind::Command,
        };
    }
    if let Some(pitch) = cli.pitch {
        cfg.speech.pitch = pitch;
    }
    if let Some(rate) = cli.rate {
        cfg.speech.rate = rate;
    }
}

/// Decode the command-line Morse once and optionally speak it.
/// Returns `false` when the input does not decode.
async fn run_once(
    morse: &str,
    speak_tx: &mpsc::Sender<SpeakRequest>,
    speak: bool,
) -> DynResult<bool> {
    let text = match mts_morse::decode(morse) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(false);
        }
    };
    println!("{}", text);

    if speak {
        let (req, done) = SpeakRequest::with_completion(text);
        speak_tx
            .send(req)
            .await
            .map_err(|_| "speech task stopped before speaking")?;
        if done.await.is_err() {
            warn!("Speech task dropped the utterance");
        }
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> DynResult<ExitCode> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", CliConfig::example_combined_toml());
        return Ok(ExitCode::SUCCESS);
    }

    let (mut cfg, config_path) = if let Some(ref path) = cli.config {
        let cfg = CliConfig::load_from_file(path)?;
        (cfg, Some(path.clone()))
    } else {
        CliConfig::load_from_default_paths()?
    };
    apply_cli_overrides(&cli, &mut cfg);
    cfg.validate()
        .map_err(|e| format!("Invalid configuration: {}", e))?;

    init_logging(cfg.general.log_level.as_deref());

    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }

    let settings = SpeechSettings::new(cfg.speech.pitch, cfg.speech.rate)?;
    let (settings_tx, settings_rx) = watch::channel(settings);
    let (speak_tx, speak_rx) = mpsc::channel::<SpeakRequest>(SPEECH_CHANNEL_BUFFER);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let engine = SpeechEngine::from_config(&cfg.speech);
    let speech_handle = tokio::spawn(speech::run_speech_task(
        engine,
        speak_rx,
        settings_rx,
        shutdown_rx,
    ));

    let result = if cli.morse.is_empty() {
        let history = History::with_max_entries(cfg.history.max_entries);
        let mut session = Session::new(history, settings_tx, speak_tx, std::io::stdout());
        let lines = session::spawn_stdin_reader()?;
        let interactive = std::io::stdin().is_terminal();
        session::run(&mut session, lines, interactive)
            .await
            .map(|_| ExitCode::SUCCESS)
    } else {
        let morse = cli.morse.join(" ");
        let result = run_once(&morse, &speak_tx, !cli.no_speak).await;
        drop(speak_tx);
        result.map(|ok| if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    };

    let _ = shutdown_tx.send(true);
    if let Err(e) = speech_handle.await {
        error!("Speech task panicked: {}", e);
    }

    result
}
