//! Rating score bounds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;

/// A rating on the 1–10 scale. The web client maps five stars onto it (×2),
/// so whole numbers are typical but fractions are accepted.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

#[derive(Debug, Error, PartialEq)]
#[error("rating must be between 1 and 10, got {0}")]
pub struct ScoreOutOfRange(pub f64);

impl Score {
    pub fn new(value: f64) -> Result<Self, ScoreOutOfRange> {
        if value.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ScoreOutOfRange(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Score at or above 8: counts as a favourite.
    pub fn is_favourite(self) -> bool {
        self.0 >= 8.0
    }

    /// Score at or below 4: counts as disliked.
    pub fn is_disliked(self) -> bool {
        self.0 <= 4.0
    }
}

impl TryFrom<f64> for Score {
    type Error = ScoreOutOfRange;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}
