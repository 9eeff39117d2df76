use pretty_assertions::assert_eq;

use scoreboard::client::{
    ACCESS_DENIED_MESSAGE, ACCESS_GRANTED_MESSAGE, AdjustError, AuthMessageKind, ClientState,
    PendingUpdate, ScoreAdjustment,
};
use scoreboard::score::TeamView;


fn team(team_number: i64, score: i64) -> TeamView {
    TeamView {
        team_number,
        team_name: format!("Team {team_number}"),
        score,
    }
}

fn authorized_client(teams: Vec<TeamView>) -> ClientState {
    let mut client = ClientState::new();
    client.set_teams(teams);
    client.set_authorized(true);
    client
}

fn score_of(client: &ClientState, team_number: i64) -> i64 {
    client.teams().iter().find(|t| t.team_number == team_number).unwrap().score
}

#[test]
fn teams_from_server_json() {
    let mut client = ClientState::new();
    client
        .set_teams_from_json(
            r#"[{"teamNumber":1,"teamName":"Sofia","score":30},
                {"teamNumber":2,"teamName":"John","score":0}]"#,
        )
        .unwrap();
    assert_eq!(client.teams().len(), 2);
    assert_eq!(client.teams()[0].team_name, "Sofia");
    assert_eq!(score_of(&client, 1), 30);
    assert!(client.set_teams_from_json("not json").is_err());
}

#[test]
fn unauthorized_client_cannot_adjust() {
    let mut client = ClientState::new();
    client.set_teams(vec![team(1, 50)]);
    assert!(!client.is_authorized());
    assert_eq!(
        client.adjust_score(1, ScoreAdjustment::Increase),
        Err(AdjustError::NotAuthorized)
    );
    assert_eq!(score_of(&client, 1), 50);
}

#[test]
fn auth_messages() {
    let mut client = ClientState::new();
    assert_eq!(client.set_authorized(true), (AuthMessageKind::Success, ACCESS_GRANTED_MESSAGE));
    assert!(client.is_authorized());
    assert_eq!(client.set_authorized(false), (AuthMessageKind::Error, ACCESS_DENIED_MESSAGE));
    assert!(!client.is_authorized());
    assert_eq!(AuthMessageKind::Success.css_class(), "success-text");
    assert_eq!(AuthMessageKind::Error.css_class(), "error-text");
}

#[test]
fn adjust_by_step() {
    let mut client = authorized_client(vec![team(1, 50), team(2, 20)]);
    assert_eq!(
        client.adjust_score(1, ScoreAdjustment::Increase),
        Ok(PendingUpdate { team_number: 1, score: 55 })
    );
    assert_eq!(
        client.adjust_score(2, ScoreAdjustment::Decrease),
        Ok(PendingUpdate { team_number: 2, score: 15 })
    );
    assert_eq!(score_of(&client, 1), 55);
    assert_eq!(score_of(&client, 2), 15);
}

#[test]
fn adjust_stops_at_bounds() {
    let mut client = authorized_client(vec![team(1, 100), team(2, 0)]);
    assert_eq!(
        client.adjust_score(1, ScoreAdjustment::Increase),
        Err(AdjustError::AtLimit { team_number: 1, score: 100 })
    );
    assert_eq!(
        client.adjust_score(2, ScoreAdjustment::Decrease),
        Err(AdjustError::AtLimit { team_number: 2, score: 0 })
    );
    assert!(client.adjust_score(1, ScoreAdjustment::Decrease).is_ok());
    assert!(client.adjust_score(2, ScoreAdjustment::Increase).is_ok());
}

#[test]
fn adjust_unknown_team() {
    let mut client = authorized_client(vec![team(1, 10)]);
    assert_eq!(
        client.adjust_score(7, ScoreAdjustment::Increase),
        Err(AdjustError::NoSuchTeam(7))
    );
}

#[test]
fn pending_update_request() {
    let update = PendingUpdate { team_number: 4, score: 65 };
    assert_eq!(update.request_path(), "/api/scores/4");
    assert_eq!(update.request_body(), r#"{"score":65}"#);
}
