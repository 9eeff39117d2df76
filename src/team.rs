use std::fmt;

use serde::{Deserialize, Serialize};


pub const MIN_TEAM_NUMBER: i64 = 1;
pub const MAX_TEAM_NUMBER: i64 = 10;
pub const NUM_TEAMS: usize = (MAX_TEAM_NUMBER - MIN_TEAM_NUMBER + 1) as usize;

// Display names are compiled in: the directory cannot change at runtime.
const TEAM_NAMES: [(i64, &str); NUM_TEAMS] = [
    (1, "Sofia"),
    (2, "John"),
    (3, "Sarah"),
    (4, "Mike"),
    (5, "a"),
    (6, "b"),
    (7, "c"),
    (8, "d"),
    (9, "e"),
    (10, "f"),
];

// A team number that is known to be in the supported range.
//
// Stored records use a raw `i64`, because a store may contain anything; this type is
// what external input has to be converted to before it may reach the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TeamNumber(i64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TeamNumberError {
    NotANumber(String),
    OutOfRange(i64),
}

impl TeamNumber {
    pub fn new(value: i64) -> Result<Self, TeamNumberError> {
        if (MIN_TEAM_NUMBER..=MAX_TEAM_NUMBER).contains(&value) {
            Ok(TeamNumber(value))
        } else {
            Err(TeamNumberError::OutOfRange(value))
        }
    }

    pub fn parse(s: &str) -> Result<Self, TeamNumberError> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| TeamNumberError::NotANumber(s.to_owned()))?;
        Self::new(value)
    }

    pub fn all() -> impl Iterator<Item = TeamNumber> {
        (MIN_TEAM_NUMBER..=MAX_TEAM_NUMBER).map(TeamNumber)
    }

    pub fn get(self) -> i64 { self.0 }
}

impl TryFrom<i64> for TeamNumber {
    type Error = TeamNumberError;
    fn try_from(value: i64) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<TeamNumber> for i64 {
    fn from(team: TeamNumber) -> i64 { team.0 }
}

impl fmt::Display for TeamNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl fmt::Display for TeamNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamNumberError::NotANumber(s) => write!(f, "'{s}' is not a team number"),
            TeamNumberError::OutOfRange(n) => write!(
                f,
                "team number {n} is outside of [{MIN_TEAM_NUMBER}, {MAX_TEAM_NUMBER}]"
            ),
        }
    }
}

impl std::error::Error for TeamNumberError {}

pub fn directory_name(team_number: i64) -> Option<&'static str> {
    TEAM_NAMES.iter().find(|(n, _)| *n == team_number).map(|(_, name)| *name)
}

// Name to show for a team: the directory entry, or "Team N" for teams the directory
// does not know about.
pub fn team_name(team_number: i64) -> String {
    directory_name(team_number)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Team {team_number}"))
}
