//! Backlog domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Progress of a game in a user's backlog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacklogStatus {
    Playing,
    Completed,
    Dropped,
    OnHold,
    Planning,
}

impl BacklogStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Completed => "completed",
            Self::Dropped => "dropped",
            Self::OnHold => "on_hold",
            Self::Planning => "planning",
        }
    }
}

impl fmt::Display for BacklogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string cannot be parsed as a [`BacklogStatus`].
#[derive(Debug, Error)]
#[error("unknown backlog status: {0:?}")]
pub struct UnknownBacklogStatus(pub String);

impl FromStr for BacklogStatus {
    type Err = UnknownBacklogStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "playing" => Ok(Self::Playing),
            "completed" => Ok(Self::Completed),
            "dropped" => Ok(Self::Dropped),
            "on_hold" => Ok(Self::OnHold),
            "planning" => Ok(Self::Planning),
            other => Err(UnknownBacklogStatus(other.to_owned())),
        }
    }
}
