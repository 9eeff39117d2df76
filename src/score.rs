use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::team::{TeamNumber, team_name};


// The client keeps scores within [MIN_SCORE, MAX_SCORE]. The server stores whatever it is given.
pub type Score = i64;

pub const MIN_SCORE: Score = 0;
pub const MAX_SCORE: Score = 100;
pub const INITIAL_SCORE: Score = 0;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamScoreRecord {
    pub team_number: i64,
    pub score: Score,
}

// What the list endpoint returns: a record joined with the team directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub team_number: i64,
    pub team_name: String,
    pub score: Score,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreUpdateRequest {
    #[serde(default)]
    pub score: Value,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScoreValueError {
    Missing,
    NotANumber(String),
    NotAnInteger(String),
}

impl TeamScoreRecord {
    pub fn new(team_number: TeamNumber, score: Score) -> Self {
        TeamScoreRecord { team_number: team_number.get(), score }
    }
}

impl TeamView {
    pub fn from_record(record: &TeamScoreRecord) -> Self {
        TeamView {
            team_number: record.team_number,
            team_name: team_name(record.team_number),
            score: record.score,
        }
    }
}

pub fn initial_records() -> Vec<TeamScoreRecord> {
    TeamNumber::all().map(|team| TeamScoreRecord::new(team, INITIAL_SCORE)).collect()
}

// Preserves store order.
pub fn join_with_directory(records: &[TeamScoreRecord]) -> Vec<TeamView> {
    records.iter().map(TeamView::from_record).collect()
}

// Team numbers that appear in more than one record. A healthy store has none.
pub fn duplicate_teams(records: &[TeamScoreRecord]) -> Vec<i64> {
    records
        .iter()
        .map(|r| r.team_number)
        .counts()
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(team_number, _)| team_number)
        .sorted()
        .collect()
}

// Supported teams without a record.
pub fn missing_teams(records: &[TeamScoreRecord]) -> Vec<TeamNumber> {
    TeamNumber::all()
        .filter(|team| !records.iter().any(|r| r.team_number == team.get()))
        .collect()
}

// Interprets the `score` field of an update request.
//
// Accepts JSON integers, floats without a fractional part and strings holding an integer.
// No range check: the server stores any integer.
pub fn parse_score_value(value: &Value) -> Result<Score, ScoreValueError> {
    match value {
        Value::Null => Err(ScoreValueError::Missing),
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                Ok(v)
            } else if let Some(v) = n.as_f64() {
                float_to_score(v).ok_or_else(|| ScoreValueError::NotAnInteger(n.to_string()))
            } else {
                Err(ScoreValueError::NotAnInteger(n.to_string()))
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(v) = s.parse::<i64>() {
                Ok(v)
            } else if let Ok(v) = s.parse::<f64>() {
                float_to_score(v).ok_or_else(|| ScoreValueError::NotAnInteger(s.to_owned()))
            } else {
                Err(ScoreValueError::NotANumber(s.to_owned()))
            }
        }
        other => Err(ScoreValueError::NotANumber(other.to_string())),
    }
}

// `i64::MAX as f64` is 2^63, which is already out of range.
fn float_to_score(v: f64) -> Option<Score> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}
