use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use tide::{Body, Request, Response, StatusCode};

use scoreboard::client::ACCESS_DENIED_MESSAGE;
use scoreboard::event::ChangeEvent;
use scoreboard::score::{ScoreUpdateRequest, join_with_directory, parse_score_value};
use scoreboard::{TeamNumber, TeamScoreRecord};

use crate::http_server_state::*;
use crate::persistence::WriteOutcome;


pub const FETCH_FAILED_MESSAGE: &str = "Error fetching scores";
pub const UPDATED_MESSAGE: &str = "Score updated successfully!";
pub const INVALID_INPUT_MESSAGE: &str = "Invalid team number or score.";
pub const TEAM_NOT_FOUND_MESSAGE: &str = "Team not found.";
pub const UPDATE_FAILED_MESSAGE: &str = "Error updating score.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

pub fn message_response(status: StatusCode, message: &str) -> tide::Result {
    let mut resp = Response::new(status);
    resp.set_body(Body::from_json(&ApiMessage { message: message.to_owned() })?);
    Ok(resp)
}

pub async fn handle_list_scores(req: Request<HttpServerState>) -> tide::Result {
    match req.state().store.read_all().await {
        Ok(records) => {
            let mut resp = Response::new(StatusCode::Ok);
            resp.set_body(Body::from_json(&join_with_directory(&records))?);
            Ok(resp)
        }
        Err(err) => {
            error!("Error reading scores: {:#}", err);
            message_response(StatusCode::InternalServerError, FETCH_FAILED_MESSAGE)
        }
    }
}

pub async fn handle_update_score(mut req: Request<HttpServerState>) -> tide::Result {
    if !is_authorized(&req) {
        return message_response(StatusCode::Unauthorized, ACCESS_DENIED_MESSAGE);
    }

    let team = TeamNumber::parse(req.param("team_number")?);
    let score = match req.body_json::<ScoreUpdateRequest>().await {
        Ok(body) => parse_score_value(&body.score).map_err(|err| format!("{err:?}")),
        Err(err) => Err(err.to_string()),
    };
    let (team, score) = match (team, score) {
        (Ok(team), Ok(score)) => (team, score),
        (team, score) => {
            warn!(
                "Rejected score update: team {:?}, score {:?}",
                team.map_err(|e| e.to_string()),
                score
            );
            return message_response(StatusCode::BadRequest, INVALID_INPUT_MESSAGE);
        }
    };

    let state = req.state();
    match state.store.write(team, score).await {
        Ok(WriteOutcome::Written) => {
            info!("Team {} score set to {}", team, score);
            if !state.store.has_native_change_feed() {
                let event = ChangeEvent::updated(TeamScoreRecord::new(team, score));
                state.subscribers.broadcast(&event.to_payload());
            }
            message_response(StatusCode::Ok, UPDATED_MESSAGE)
        }
        Ok(WriteOutcome::NotFound) => message_response(StatusCode::NotFound, TEAM_NOT_FOUND_MESSAGE),
        Err(err) => {
            error!("Error updating score of team {}: {:#}", team, err);
            message_response(StatusCode::InternalServerError, UPDATE_FAILED_MESSAGE)
        }
    }
}
