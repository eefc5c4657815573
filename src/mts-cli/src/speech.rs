// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Speech task: hands decoded text to a text-to-speech engine.
//!
//! Only one utterance plays at a time. A new request kills the one in
//! progress before starting.

use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use mts_core::{SpeakRequest, SpeechSettings};

use crate::config::{CommandConfig, SpeechConfig, SpeechEngineKind};

/// Engine selected for the speech task.
#[derive(Debug, Clone)]
pub enum SpeechEngine {
    Log,
    Command(CommandConfig),
}

impl SpeechEngine {
    pub fn from_config(cfg: &SpeechConfig) -> Self {
        match cfg.engine {
            SpeechEngineKind::Log => SpeechEngine::Log,
            SpeechEngineKind::Command => SpeechEngine::Command(cfg.command.clone()),
        }
    }
}

/// Expand `{text}`, `{pitch}` and `{rate}` in command argument templates.
pub fn render_args(cfg: &CommandConfig, text: &str, settings: &SpeechSettings) -> Vec<String> {
    let pitch = ((settings.pitch * cfg.base_pitch).round() as i64).to_string();
    let rate = ((settings.rate * cfg.base_rate).round() as i64).to_string();
    cfg.args
        .iter()
        .map(|arg| {
            arg.replace("{pitch}", &pitch)
                .replace("{rate}", &rate)
                .replace("{text}", text)
        })
        .collect()
}

struct Utterance {
    child: Child,
    done: Option<oneshot::Sender<()>>,
}

impl Utterance {
    fn finish(self) {
        if let Some(done) = self.done {
            let _ = done.send(());
        }
    }
}

fn notify(done: Option<oneshot::Sender<()>>) {
    if let Some(done) = done {
        let _ = done.send(());
    }
}

/// Start speaking. Returns the running utterance for command engines, or
/// `None` when there is nothing left to wait for.
fn speak(
    engine: &SpeechEngine,
    req: SpeakRequest,
    settings: &SpeechSettings,
) -> Option<Utterance> {
    match engine {
        SpeechEngine::Log => {
            info!(
                "Speaking (pitch {:.1}, rate {:.1}): {}",
                settings.pitch, settings.rate, req.text
            );
            notify(req.done);
            None
        }
        SpeechEngine::Command(cfg) => {
            let args = render_args(cfg, &req.text, settings);
            debug!("Spawning {} {:?}", cfg.program, args);
            let spawned = Command::new(&cfg.program)
                .args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .spawn();
            match spawned {
                Ok(child) => Some(Utterance {
                    child,
                    done: req.done,
                }),
                Err(e) => {
                    warn!("Failed to start speech command '{}': {}", cfg.program, e);
                    notify(req.done);
                    None
                }
            }
        }
    }
}

async fn flush(current: &mut Option<Utterance>) {
    if let Some(mut utterance) = current.take() {
        if let Err(e) = utterance.child.kill().await {
            debug!("Speech command already gone: {}", e);
        }
        utterance.finish();
    }
}

async fn wait_current(current: &mut Option<Utterance>) -> std::io::Result<ExitStatus> {
    match current {
        Some(utterance) => utterance.child.wait().await,
        None => std::future::pending().await,
    }
}

/// Run the speech task until the request channel closes or shutdown is
/// signalled.
pub async fn run_speech_task(
    engine: SpeechEngine,
    mut rx: mpsc::Receiver<SpeakRequest>,
    settings_rx: watch::Receiver<SpeechSettings>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    match &engine {
        SpeechEngine::Log => info!("Speech engine: log only"),
        SpeechEngine::Command(cfg) => info!("Speech engine: {}", cfg.program),
    }

    let mut current: Option<Utterance> = None;
    loop {
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            maybe_req = rx.recv() => {
                let Some(req) = maybe_req else {
                    break;
                };
                flush(&mut current).await;
                let settings = *settings_rx.borrow();
                current = speak(&engine, req, &settings);
            }
            status = wait_current(&mut current) => {
                if let Some(utterance) = current.take() {
                    match status {
                        Ok(status) if status.success() => debug!("Utterance finished"),
                        Ok(status) => warn!("Speech command exited with {}", status),
                        Err(e) => warn!("Waiting for speech command failed: {}", e),
                    }
                    utterance.finish();
                }
            }
        }
    }

    flush(&mut current).await;
    debug!("Speech task stopped");
}
