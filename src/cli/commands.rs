//! Interactive session commands read from stdin

use std::str::FromStr;

use thiserror::Error;

use crate::domain::error::DurationParseError;
use crate::domain::recording::Duration;

/// One line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Record,
    Pause,
    Finish,
    Reset,
    Preview,
    Flash,
    Switch,
    Capture,
    Undo,
    Remove(usize),
    Clear,
    Status,
    /// Let time pass without reading input; useful when piping a script
    Wait(Duration),
    Help,
    Quit,
}

/// Errors when parsing a session command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    Unknown(String),

    #[error("'{command}' needs an argument: {usage}")]
    MissingArgument {
        command: &'static str,
        usage: &'static str,
    },

    #[error("Invalid segment index '{0}'")]
    InvalidIndex(String),

    #[error(transparent)]
    InvalidDuration(#[from] DurationParseError),

    #[error("'{0}' takes no arguments")]
    UnexpectedArgument(String),
}

impl SessionCommand {
    /// Parse a line, returning `None` for blank lines and `#` comments
    pub fn parse_line(line: &str) -> Result<Option<Self>, CommandParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        line.parse().map(Some)
    }
}

impl FromStr for SessionCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().unwrap_or_default().to_lowercase();
        let argument = words.next();

        let command = match name.as_str() {
            "remove" | "rm" => {
                let raw = argument.ok_or(CommandParseError::MissingArgument {
                    command: "remove",
                    usage: "remove <index>",
                })?;
                let index = raw
                    .parse()
                    .map_err(|_| CommandParseError::InvalidIndex(raw.to_string()))?;
                return Ok(Self::Remove(index));
            }
            "wait" | "sleep" => {
                let raw = argument.ok_or(CommandParseError::MissingArgument {
                    command: "wait",
                    usage: "wait <time>",
                })?;
                return Ok(Self::Wait(raw.parse()?));
            }
            "record" | "r" => Self::Record,
            "pause" | "p" => Self::Pause,
            "finish" | "f" => Self::Finish,
            "reset" => Self::Reset,
            "preview" => Self::Preview,
            "flash" => Self::Flash,
            "switch" | "flip" => Self::Switch,
            "capture" | "snap" => Self::Capture,
            "undo" => Self::Undo,
            "clear" => Self::Clear,
            "status" | "s" => Self::Status,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => return Err(CommandParseError::Unknown(s.trim().to_string())),
        };

        if argument.is_some() {
            return Err(CommandParseError::UnexpectedArgument(name));
        }
        Ok(command)
    }
}

/// Help text for the interactive prompt
pub const HELP: &str = "\
Commands:
  record, r        start or resume recording
  pause, p         stop the current segment
  finish, f        end the take (no more recording until reset)
  reset            discard the take and start over
  preview          assemble the take for playback
  flash            toggle the flash light
  switch           switch between front and back cameras
  capture          take a still picture
  undo             remove the last segment
  remove <index>   remove the segment at index
  clear            remove every segment
  status, s        show the session state
  wait <time>      let time pass (e.g. wait 500ms)
  help, h          show this help
  quit, q          leave the session";
