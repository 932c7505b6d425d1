use std::{fmt, sync::Arc, time::Duration};

use tracing::{debug, warn};

use crate::{
    api::{QuizGateway, SessionId, Team},
    error::ClientError,
    services::celebration::Celebration,
    state::SharedStore,
};

/// Teacher-issued command forwarded to the remote authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Go back one question.
    Previous,
    /// Advance one question.
    Next,
    /// Reveal the current answer.
    Reveal,
    /// Award the current question to a team.
    MarkCorrect(Team),
    /// Undo the last scoring action.
    Undo,
}

impl Command {
    /// Scoring commands open the celebration window on success.
    pub fn is_scoring(self) -> bool {
        matches!(self, Command::MarkCorrect(_))
    }

    /// Prefix of the error message shown when the command fails.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            Command::Previous => "Failed to go to previous question",
            Command::Next => "Failed to go to next question",
            Command::Reveal => "Failed to reveal answer",
            Command::MarkCorrect(Team::A) => "Failed to mark correct for Team A",
            Command::MarkCorrect(Team::B) => "Failed to mark correct for Team B",
            Command::Undo => "Failed to undo last action",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Previous => f.write_str("previous"),
            Command::Next => f.write_str("next"),
            Command::Reveal => f.write_str("reveal"),
            Command::MarkCorrect(team) => write!(f, "mark-correct {team}"),
            Command::Undo => f.write_str("undo"),
        }
    }
}

/// What happened to a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The remote authority accepted the command.
    Applied,
    /// The command failed; carries the message written to the error slot.
    Failed(String),
}

/// Runs teacher commands against the gateway and folds the outcome into the store.
///
/// The dispatcher never touches the view model and never re-fetches: the next
/// poll tick picks up the command's effect. Concurrent dispatches are allowed
/// to race; each outcome is written on its own.
pub struct CommandDispatcher {
    gateway: Arc<dyn QuizGateway>,
    store: SharedStore,
    session: Option<SessionId>,
    celebration: Celebration,
}

impl CommandDispatcher {
    /// Build a dispatcher for `session`, opening a celebration of `celebration_window`
    /// after each successful scoring command.
    pub fn new(
        gateway: Arc<dyn QuizGateway>,
        store: SharedStore,
        session: Option<SessionId>,
        celebration_window: Duration,
    ) -> Self {
        let celebration = Celebration::new(store.clone(), celebration_window);
        Self {
            gateway,
            store,
            session,
            celebration,
        }
    }

    /// Execute `command` and record its outcome.
    pub async fn dispatch(&self, command: Command) -> DispatchOutcome {
        let session = self.session.clone();
        let call = match command {
            Command::Previous => self.gateway.go_previous(session),
            Command::Next => self.gateway.go_next(session),
            Command::Reveal => self.gateway.reveal(session),
            Command::MarkCorrect(team) => self.gateway.mark_correct(session, team),
            Command::Undo => self.gateway.undo(session),
        };

        match call.await {
            Ok(_ack) => {
                if command.is_scoring() {
                    self.celebration.trigger();
                }
                self.store.clear_error();
                debug!(%command, "command applied");
                DispatchOutcome::Applied
            }
            Err(err) => {
                let message = failure_message(command.failure_prefix(), &err);
                warn!(%command, error = %err, "command failed");
                self.store.record_error(message.clone());
                DispatchOutcome::Failed(message)
            }
        }
    }
}

fn failure_message(prefix: &str, err: &ClientError) -> String {
    let detail = err.to_string();
    if detail.trim().is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}: {detail}")
    }
}
