// Browser-independent part of the scoreboard page. The wasm client owns a `ClientState` and
// only adds DOM rendering on top of it.

use serde::Serialize;

use crate::network::scores_update_path;
use crate::score::{MAX_SCORE, MIN_SCORE, Score, TeamView};


pub const SCORE_STEP: Score = 5;

pub const ACCESS_GRANTED_MESSAGE: &str = "Access granted! You can now adjust scores.";
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied! Only admins can adjust scores.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreAdjustment {
    Increase,
    Decrease,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdjustError {
    NotAuthorized,
    NoSuchTeam(i64),
    // The score is already at the boundary the adjustment moves towards.
    AtLimit { team_number: i64, score: Score },
}

// A score change that has been applied locally and must be sent to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingUpdate {
    pub team_number: i64,
    pub score: Score,
}

#[derive(Serialize)]
struct UpdateBody {
    score: Score,
}

impl PendingUpdate {
    pub fn request_path(&self) -> String { scores_update_path(self.team_number) }

    pub fn request_body(&self) -> String {
        // Serializing a struct with one integer field cannot fail.
        serde_json::to_string(&UpdateBody { score: self.score }).unwrap()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMessageKind {
    Success,
    Error,
}

impl AuthMessageKind {
    pub fn css_class(self) -> &'static str {
        match self {
            AuthMessageKind::Success => "success-text",
            AuthMessageKind::Error => "error-text",
        }
    }
}

#[derive(Debug, Default)]
pub struct ClientState {
    teams: Vec<TeamView>,
    // Reflects the server's verdict on the last login attempt. The server enforces
    // authorization on its own; this flag only decides what the page offers.
    authorized: bool,
}

impl ClientState {
    pub fn new() -> Self { Self::default() }

    pub fn teams(&self) -> &[TeamView] { &self.teams }
    pub fn is_authorized(&self) -> bool { self.authorized }

    pub fn set_teams(&mut self, teams: Vec<TeamView>) { self.teams = teams; }

    pub fn set_teams_from_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        self.teams = serde_json::from_str(json)?;
        Ok(())
    }

    pub fn set_authorized(&mut self, authorized: bool) -> (AuthMessageKind, &'static str) {
        self.authorized = authorized;
        if authorized {
            (AuthMessageKind::Success, ACCESS_GRANTED_MESSAGE)
        } else {
            (AuthMessageKind::Error, ACCESS_DENIED_MESSAGE)
        }
    }

    // Applies the adjustment locally. On success the returned update must be sent to the server.
    pub fn adjust_score(
        &mut self, team_number: i64, adjustment: ScoreAdjustment,
    ) -> Result<PendingUpdate, AdjustError> {
        if !self.authorized {
            return Err(AdjustError::NotAuthorized);
        }
        let team = self
            .teams
            .iter_mut()
            .find(|t| t.team_number == team_number)
            .ok_or(AdjustError::NoSuchTeam(team_number))?;
        let new_score = match adjustment {
            ScoreAdjustment::Increase if team.score < MAX_SCORE => team.score + SCORE_STEP,
            ScoreAdjustment::Decrease if team.score > MIN_SCORE => team.score - SCORE_STEP,
            _ => {
                return Err(AdjustError::AtLimit { team_number, score: team.score });
            }
        };
        team.score = new_score;
        Ok(PendingUpdate { team_number, score: new_score })
    }
}
