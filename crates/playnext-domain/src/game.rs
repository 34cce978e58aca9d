//! Game catalog domain types.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::pagination::Sort;

/// Column a game listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSortField {
    GameId,
    GameName,
    Genre,
    Platform,
    ReleaseDate,
    AgeRating,
    IgdbId,
}

impl fmt::Display for GameSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::GameId => "game_id",
            Self::GameName => "game_name",
            Self::Genre => "genre",
            Self::Platform => "platform",
            Self::ReleaseDate => "release_date",
            Self::AgeRating => "age_rating",
            Self::IgdbId => "igdb_id",
        };
        f.write_str(s)
    }
}

/// Sort order for the `GET /games` listing.
///
/// Wire format is the column name, prefixed with `-` for descending order
/// (`"game_name"`, `"-release_date"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSortBy {
    pub field: GameSortField,
    pub sort: Sort,
}

impl Default for GameSortBy {
    fn default() -> Self {
        Self {
            field: GameSortField::GameId,
            sort: Sort::Asc,
        }
    }
}

impl fmt::Display for GameSortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sort == Sort::Desc {
            f.write_str("-")?;
        }
        self.field.fmt(f)
    }
}

/// Error returned when a string does not name a sortable game column.
#[derive(Debug, Error)]
#[error("unknown game sort field: {0:?}")]
pub struct UnknownSortField(pub String);

impl FromStr for GameSortBy {
    type Err = UnknownSortField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sort, column) = match s.strip_prefix('-') {
            Some(rest) => (Sort::Desc, rest),
            None => (Sort::Asc, s),
        };
        let field = match column {
            "game_id" => GameSortField::GameId,
            "game_name" => GameSortField::GameName,
            "genre" => GameSortField::Genre,
            "platform" => GameSortField::Platform,
            "release_date" => GameSortField::ReleaseDate,
            "age_rating" => GameSortField::AgeRating,
            "igdb_id" => GameSortField::IgdbId,
            _ => return Err(UnknownSortField(s.to_owned())),
        };
        Ok(Self { field, sort })
    }
}
