//! Request bodies sent to the remote session authority.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Identifier of a quiz run on the remote authority.
///
/// Always absent today; threaded through every call for future multi-session routing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a raw session identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Team that can be awarded a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Team A.
    A,
    /// Team B.
    B,
}

impl Team {
    /// Wire code of the team.
    pub fn code(self) -> &'static str {
        match self {
            Team::A => "A",
            Team::B => "B",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Team {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "A" => Ok(Team::A),
            "B" => Ok(Team::B),
            other => Err(ClientError::InvalidArgument(format!(
                "team must be `A` or `B` (got `{other}`)"
            ))),
        }
    }
}

/// Body of the navigation, reveal and undo commands.
#[derive(Debug, Serialize)]
pub struct SessionRequest<'a> {
    /// Target session, serialised as `null` when absent.
    pub session: Option<&'a SessionId>,
}

/// Body of the mark-correct command.
#[derive(Debug, Serialize)]
pub struct MarkCorrectRequest<'a> {
    /// Target session, serialised as `null` when absent.
    pub session: Option<&'a SessionId>,
    /// Team being awarded the point.
    pub team: Team,
}
