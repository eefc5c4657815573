// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Interactive session: reads Morse lines and commands, keeps the history
//! and speech settings, and forwards decoded text to the speech task.

use std::io::{BufRead, Write};

use chrono::DateTime;
use tokio::signal;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use mts_core::{DynResult, History, SpeakRequest, SpeechSettings};
use mts_morse::{decode, describe_valid_characters, encode, is_valid_input, symbols};

use crate::commands::{parse_line, Input, SessionCommand, HELP};

const PROMPT: &str = "morse> ";
const STDIN_CHANNEL_BUFFER: usize = 16;

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<W: Write> {
    history: History,
    settings_tx: watch::Sender<SpeechSettings>,
    speak_tx: mpsc::Sender<SpeakRequest>,
    out: W,
}

fn format_timestamp(ts_ms: u64) -> String {
    DateTime::from_timestamp_millis(ts_ms as i64)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts_ms.to_string())
}

impl<W: Write> Session<W> {
    pub fn new(
        history: History,
        settings_tx: watch::Sender<SpeechSettings>,
        speak_tx: mpsc::Sender<SpeakRequest>,
        out: W,
    ) -> Self {
        Self {
            history,
            settings_tx,
            speak_tx,
            out,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn settings(&self) -> SpeechSettings {
        *self.settings_tx.borrow()
    }

    pub async fn handle_line(&mut self, line: &str) -> DynResult<Flow> {
        match parse_line(line) {
            Ok(Input::Empty) => {}
            Ok(Input::Morse(morse)) => self.convert(&morse).await?,
            Ok(Input::Command(cmd)) => return self.run_command(cmd).await,
            Err(msg) => writeln!(self.out, "{}", msg)?,
        }
        Ok(Flow::Continue)
    }

    async fn convert(&mut self, morse: &str) -> DynResult<()> {
        if !is_valid_input(morse) {
            writeln!(self.out, "{}", describe_valid_characters())?;
            return Ok(());
        }
        match decode(morse) {
            Ok(text) => {
                self.history.add(morse.trim(), text.as_str());
                writeln!(self.out, "{}", text)?;
                self.speak(text).await;
            }
            Err(e) => {
                debug!("Rejected input {:?}: {}", morse, e);
                writeln!(self.out, "{}", e)?;
            }
        }
        Ok(())
    }

    async fn speak(&self, text: String) {
        if self.speak_tx.send(SpeakRequest::new(text)).await.is_err() {
            warn!("Speech task is not running; utterance dropped");
        }
    }

    async fn run_command(&mut self, cmd: SessionCommand) -> DynResult<Flow> {
        match cmd {
            SessionCommand::Help => {
                writeln!(self.out, "{}", HELP)?;
                writeln!(self.out, "{}", describe_valid_characters())?;
            }
            SessionCommand::History { json } => self.print_history(json)?,
            SessionCommand::Play(n) => match self.history.get(n - 1) {
                Some(record) => {
                    let text = record.text.clone();
                    writeln!(self.out, "{}", text)?;
                    self.speak(text).await;
                }
                None => writeln!(self.out, "No history entry {}", n)?,
            },
            SessionCommand::Clear => {
                self.history.clear();
                writeln!(self.out, "History cleared")?;
            }
            SessionCommand::Pitch(pitch) => {
                let updated = self.settings().with_pitch(pitch);
                self.apply_settings(updated)?;
            }
            SessionCommand::Rate(rate) => {
                let updated = self.settings().with_rate(rate);
                self.apply_settings(updated)?;
            }
            SessionCommand::Settings => self.print_settings()?,
            SessionCommand::Encode(text) => match encode(&text) {
                Ok(morse) => writeln!(self.out, "{}", morse)?,
                Err(e) => writeln!(self.out, "{}", e)?,
            },
            SessionCommand::Table => {
                for (symbol, token) in symbols() {
                    writeln!(self.out, "{:<10} {}", symbol, token)?;
                }
            }
            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn apply_settings(
        &mut self,
        updated: Result<SpeechSettings, mts_core::SettingsError>,
    ) -> DynResult<()> {
        match updated {
            Ok(settings) => {
                self.settings_tx.send_replace(settings);
                self.print_settings()
            }
            Err(e) => {
                writeln!(self.out, "{}", e)?;
                Ok(())
            }
        }
    }

    fn print_settings(&mut self) -> DynResult<()> {
        let settings = self.settings();
        writeln!(
            self.out,
            "pitch {:.1}, rate {:.1}",
            settings.pitch, settings.rate
        )?;
        Ok(())
    }

    fn print_history(&mut self, json: bool) -> DynResult<()> {
        if self.history.is_empty() {
            if !json {
                writeln!(self.out, "History is empty")?;
            }
            return Ok(());
        }
        for (idx, record) in self.history.iter().enumerate() {
            if json {
                writeln!(self.out, "{}", serde_json::to_string(record)?)?;
            } else {
                writeln!(
                    self.out,
                    "{:>3}. {}  {} -> {}",
                    idx + 1,
                    format_timestamp(record.timestamp_ms),
                    record.morse,
                    record.text
                )?;
            }
        }
        Ok(())
    }

    fn prompt(&mut self) -> DynResult<()> {
        write!(self.out, "{}", PROMPT)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Read stdin on a dedicated thread and forward each line.
///
/// A blocking stdin read cannot be cancelled, so it must not sit on the
/// runtime's blocking pool or shutdown waits for the next Enter key.
pub fn spawn_stdin_reader() -> std::io::Result<mpsc::Receiver<std::io::Result<String>>> {
    let (tx, rx) = mpsc::channel(STDIN_CHANNEL_BUFFER);
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Feed lines into the session until `:quit`, end of input or Ctrl+C.
pub async fn run<W: Write>(
    session: &mut Session<W>,
    mut lines: mpsc::Receiver<std::io::Result<String>>,
    interactive: bool,
) -> DynResult<()> {
    if interactive {
        writeln!(session.out, "{}", describe_valid_characters())?;
        writeln!(session.out, "Type :help for commands.")?;
        session.prompt()?;
    }

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down");
                break;
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    break;
                };
                if session.handle_line(&line?).await? == Flow::Quit {
                    break;
                }
                if interactive {
                    session.prompt()?;
                }
            }
        }
    }

    info!("Session ended with {} conversion(s)", session.history().len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Harness {
        session: Session<Vec<u8>>,
        speak_rx: mpsc::Receiver<SpeakRequest>,
        settings_rx: watch::Receiver<SpeechSettings>,
    }

    fn harness() -> Harness {
        let (settings_tx, settings_rx) = watch::channel(SpeechSettings::default());
        let (speak_tx, speak_rx) = mpsc::channel(8);
        Harness {
            session: Session::new(History::new(), settings_tx, speak_tx, Vec::new()),
            speak_rx,
            settings_rx,
        }
    }

    impl Harness {
        async fn send(&mut self, line: &str) -> Flow {
            self.session.handle_line(line).await.unwrap()
        }

        fn take_output(&mut self) -> String {
            String::from_utf8(std::mem::take(&mut self.session.out)).unwrap()
        }
    }

    #[tokio::test]
    async fn test_morse_line_decodes_records_and_speaks() {
        let mut h = harness();
        assert_eq!(h.send(".- / -...").await, Flow::Continue);
        assert_eq!(h.take_output(), "A B\n");

        let record = h.session.history().get(0).unwrap();
        assert_eq!(record.morse, ".- / -...");
        assert_eq!(record.text, "A B");

        let req = h.speak_rx.try_recv().unwrap();
        assert_eq!(req.text, "A B");
    }

    #[tokio::test]
    async fn test_crlf_and_tab_are_trimmed_before_validation() {
        let mut h = harness();
        h.send(".- / -...\r").await;
        assert_eq!(h.take_output(), "A B\n");
        h.send("\t...---...\t").await;
        assert_eq!(h.take_output(), "SOS\n");
        assert_eq!(h.session.history().len(), 2);
        assert_eq!(h.session.history().get(1).unwrap().morse, ".- / -...");
    }

    #[tokio::test]
    async fn test_run_stops_at_quit() {
        let mut h = harness();
        let (tx, rx) = mpsc::channel(8);
        for line in [".-", ":quit", "-"] {
            tx.send(Ok(line.to_string())).await.unwrap();
        }
        run(&mut h.session, rx, false).await.unwrap();
        assert_eq!(h.take_output(), "A\n");
        assert_eq!(h.session.history().len(), 1);
    }

    #[tokio::test]
    async fn test_run_stops_at_end_of_input() {
        let mut h = harness();
        let (tx, rx) = mpsc::channel(8);
        tx.send(Ok("...".to_string())).await.unwrap();
        tx.send(Ok("---".to_string())).await.unwrap();
        drop(tx);
        run(&mut h.session, rx, false).await.unwrap();
        assert_eq!(h.take_output(), "S\nO\n");
        assert_eq!(h.speak_rx.try_recv().unwrap().text, "S");
        assert_eq!(h.speak_rx.try_recv().unwrap().text, "O");
    }

    #[tokio::test]
    async fn test_run_propagates_read_errors() {
        let mut h = harness();
        let (tx, rx) = mpsc::channel(8);
        tx.send(Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "bad utf-8")))
            .await
            .unwrap();
        assert!(run(&mut h.session, rx, false).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_characters_show_help() {
        let mut h = harness();
        h.send(".x-").await;
        assert_eq!(h.take_output(), format!("{}\n", describe_valid_characters()));
        assert!(h.session.history().is_empty());
        assert!(h.speak_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_decode_error_is_reported() {
        let mut h = harness();
        h.send(".......").await;
        assert_eq!(h.take_output(), "Invalid Morse code: .......\n");
        assert!(h.session.history().is_empty());
        assert!(h.speak_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_empty_line_is_ignored() {
        let mut h = harness();
        assert_eq!(h.send("").await, Flow::Continue);
        assert_eq!(h.take_output(), "");
    }

    #[tokio::test]
    async fn test_history_and_play() {
        let mut h = harness();
        h.send("...").await;
        h.send("---").await;
        h.take_output();
        while h.speak_rx.try_recv().is_ok() {}

        h.send(":history").await;
        let listing = h.take_output();
        let lines: Vec<_> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. "));
        assert!(lines[0].ends_with("--- -> O"));
        assert!(lines[1].ends_with("... -> S"));

        h.send(":play 2").await;
        assert_eq!(h.take_output(), "S\n");
        assert_eq!(h.speak_rx.try_recv().unwrap().text, "S");

        h.send(":play 5").await;
        assert_eq!(h.take_output(), "No history entry 5\n");
    }

    #[tokio::test]
    async fn test_history_json() {
        let mut h = harness();
        h.send("...---...").await;
        h.take_output();
        h.send(":history json").await;
        let out = h.take_output();
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["text"], "SOS");
        assert_eq!(value["morse"], "...---...");
    }

    #[tokio::test]
    async fn test_clear_history() {
        let mut h = harness();
        h.send(".").await;
        h.send(":clear").await;
        assert!(h.session.history().is_empty());
        h.take_output();
        h.send(":history").await;
        assert_eq!(h.take_output(), "History is empty\n");
    }

    #[tokio::test]
    async fn test_settings_updates_publish() {
        let mut h = harness();
        h.send(":pitch 1.5").await;
        assert_eq!(h.take_output(), "pitch 1.5, rate 1.0\n");
        h.send(":rate 0.5").await;
        assert_eq!(h.take_output(), "pitch 1.5, rate 0.5\n");
        assert_eq!(
            *h.settings_rx.borrow(),
            SpeechSettings {
                pitch: 1.5,
                rate: 0.5
            }
        );

        h.send(":rate 4").await;
        assert!(h.take_output().contains("out of range"));
        assert_eq!(h.session.settings().rate, 0.5);
    }

    #[tokio::test]
    async fn test_encode_and_table() {
        let mut h = harness();
        h.send(":encode sos").await;
        assert_eq!(h.take_output(), "... --- ...\n");
        h.send(":encode #").await;
        assert!(h.take_output().contains("'#'"));
        h.send(":table").await;
        assert_eq!(h.take_output().lines().count(), 41);
    }

    #[tokio::test]
    async fn test_bad_command_and_quit() {
        let mut h = harness();
        assert_eq!(h.send(":nope").await, Flow::Continue);
        assert!(h.take_output().starts_with("Unknown command"));
        assert_eq!(h.send(":quit").await, Flow::Quit);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(1_700_000_000_000), "2023-11-14 22:13:20 UTC");
    }
}
