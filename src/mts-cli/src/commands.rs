// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Parsing of session input lines.

use mts_app::normalize_name;

/// Prefix marking a session command.
pub const COMMAND_PREFIX: char = ':';

/// Session command typed after [`COMMAND_PREFIX`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Help,
    History { json: bool },
    /// 1-based index into the history, newest first.
    Play(usize),
    Clear,
    Pitch(f32),
    Rate(f32),
    Settings,
    Encode(String),
    Table,
    Quit,
}

/// One line of session input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Empty,
    Morse(String),
    Command(SessionCommand),
}

pub const HELP: &str = "\
:help            show this help
:history [json]  list conversions, newest first
:play N          speak history entry N again
:clear           clear history
:pitch X         set pitch (0.5..2.0)
:rate X          set speech rate (0.5..2.0)
:settings        show speech settings
:encode TEXT     print TEXT as Morse
:table           print the Morse table
:quit            leave";

pub fn parse_line(line: &str) -> Result<Input, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Input::Empty);
    }
    let Some(body) = trimmed.strip_prefix(COMMAND_PREFIX) else {
        return Ok(Input::Morse(trimmed.to_string()));
    };

    let (name, arg) = match body.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (body, ""),
    };

    let cmd = match normalize_name(name).as_str() {
        "help" | "h" => SessionCommand::Help,
        "history" | "hist" => match arg {
            "" => SessionCommand::History { json: false },
            "json" => SessionCommand::History { json: true },
            _ => return Err("usage: :history [json]".to_string()),
        },
        "play" | "p" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => SessionCommand::Play(n),
            _ => return Err("usage: :play N (N >= 1)".to_string()),
        },
        "clear" => SessionCommand::Clear,
        "pitch" => SessionCommand::Pitch(parse_param(arg, ":pitch")?),
        "rate" => SessionCommand::Rate(parse_param(arg, ":rate")?),
        "settings" => SessionCommand::Settings,
        "encode" => {
            if arg.is_empty() {
                return Err("usage: :encode TEXT".to_string());
            }
            SessionCommand::Encode(arg.to_string())
        }
        "table" => SessionCommand::Table,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => return Err(format!("Unknown command :{}; try :help", other)),
    };
    Ok(Input::Command(cmd))
}

fn parse_param(arg: &str, usage: &str) -> Result<f32, String> {
    arg.parse::<f32>()
        .map_err(|_| format!("usage: {} X (0.5..2.0)", usage))
}
