//! Parsing of teacher keyboard input into commands.

use crate::{
    api::Team,
    error::{ClientError, ClientResult},
    services::Command,
};

/// One line of teacher input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlInput {
    /// Forward a command to the dispatcher.
    Command(Command),
    /// Leave the client.
    Quit,
}

/// Parse a trimmed, non-empty input line.
///
/// Accepts `p`/`prev`, `n`/`next`, `r`/`reveal`, `a`, `b`, `correct <team>`,
/// `u`/`undo` and `q`/`quit`, case-insensitively.
pub fn parse_input(line: &str) -> ClientResult<ControlInput> {
    let line = line.trim().to_ascii_lowercase();
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default();
    let argument = words.next();

    let command = match (verb, argument) {
        ("p" | "prev" | "previous", None) => Command::Previous,
        ("n" | "next", None) => Command::Next,
        ("r" | "reveal", None) => Command::Reveal,
        ("a", None) => Command::MarkCorrect(Team::A),
        ("b", None) => Command::MarkCorrect(Team::B),
        ("c" | "correct", Some(team)) => {
            Command::MarkCorrect(team.to_ascii_uppercase().parse()?)
        }
        ("u" | "undo", None) => Command::Undo,
        ("q" | "quit", None) => return Ok(ControlInput::Quit),
        _ => {
            return Err(ClientError::InvalidArgument(format!(
                "unknown control `{}`",
                line.trim()
            )));
        }
    };

    if words.next().is_some() {
        return Err(ClientError::InvalidArgument(format!(
            "unexpected trailing input in `{line}`"
        )));
    }
    Ok(ControlInput::Command(command))
}
