#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod web_document;
pub mod web_element_ext;
pub mod web_error_handling;

use wasm_bindgen::prelude::*;

use scoreboard::battery::battery_icon;
use scoreboard::client::*;

use crate::web_document::web_document;
use crate::web_element_ext::WebElementExt;
use crate::web_error_handling::JsResult;


const SCOREBOARD_ID: &str = "scoreboard";
const AUTH_MESSAGE_ID: &str = "errorMessage";

// Request the page must send to the server after a local score change.
#[wasm_bindgen(getter_with_clone)]
pub struct ScoreRequest {
    pub path: String,
    pub body: String,
}

#[wasm_bindgen]
#[derive(Default)]
pub struct WebClient {
    state: ClientState,
}

#[wasm_bindgen]
impl WebClient {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self { Self::default() }

    // Takes the body of `GET /api/scores`.
    pub fn update_teams(&mut self, teams_json: &str) -> JsResult<()> {
        self.state
            .set_teams_from_json(teams_json)
            .map_err(|err| rust_error!("Cannot parse teams: {}", err))?;
        self.render_teams()
    }

    pub fn render_teams(&self) -> JsResult<()> {
        let scoreboard = web_document()?.get_existing_element_by_id(SCOREBOARD_ID)?;
        scoreboard.remove_all_children();
        for team in self.state.teams() {
            let n = team.team_number;
            let team_node = scoreboard
                .append_new_element("div")?
                .with_id(&format!("team{n}"))
                .with_classes(["team"])?;
            team_node.append_new_element("h2")?.set_text_content(Some(&team.team_name));
            team_node
                .append_new_element("div")?
                .with_classes(["battery"])?
                .append_new_element("img")?
                .with_id(&format!("batteryIcon{n}"))
                .with_classes(["battery-icon"])?
                .with_attribute("alt", "Battery")?
                .with_attribute("src", &battery_icon(team.score))?;
            // The page handles clicks by these data attributes.
            for (action, label) in [("increase", "+5"), ("decrease", "-5")] {
                team_node
                    .append_new_element("button")?
                    .with_text_content(label)
                    .with_attribute("data-action", action)?
                    .with_attribute("data-team", &n.to_string())?;
            }
            let score_line = team_node.append_new_element("p")?.with_text_content("Score: ");
            score_line
                .append_new_element("span")?
                .with_id(&format!("score{n}"))
                .set_text_content(Some(&team.score.to_string()));
        }
        Ok(())
    }

    pub fn is_authorized(&self) -> bool { self.state.is_authorized() }

    // Stores the server's verdict on a login attempt and tells the user about it.
    pub fn set_authorized(&mut self, authorized: bool) -> JsResult<()> {
        let (kind, message) = self.state.set_authorized(authorized);
        show_auth_message(kind, message)
    }

    // Team numbers are plain JS numbers rather than BigInt.
    pub fn increase_score(&mut self, team_number: i32) -> JsResult<Option<ScoreRequest>> {
        self.adjust(team_number.into(), ScoreAdjustment::Increase)
    }

    pub fn decrease_score(&mut self, team_number: i32) -> JsResult<Option<ScoreRequest>> {
        self.adjust(team_number.into(), ScoreAdjustment::Decrease)
    }
}

impl WebClient {
    fn adjust(
        &mut self, team_number: i64, adjustment: ScoreAdjustment,
    ) -> JsResult<Option<ScoreRequest>> {
        match self.state.adjust_score(team_number, adjustment) {
            Ok(update) => {
                self.render_teams()?;
                Ok(Some(ScoreRequest {
                    path: update.request_path(),
                    body: update.request_body(),
                }))
            }
            Err(AdjustError::NotAuthorized) => {
                show_auth_message(AuthMessageKind::Error, ACCESS_DENIED_MESSAGE)?;
                Ok(None)
            }
            Err(AdjustError::AtLimit { .. }) => Ok(None),
            Err(AdjustError::NoSuchTeam(team_number)) => {
                web_sys::console::warn_1(&format!("Unknown team {team_number}").into());
                Ok(None)
            }
        }
    }
}

fn show_auth_message(kind: AuthMessageKind, message: &str) -> JsResult<()> {
    let node = web_document()?.get_existing_element_by_id(AUTH_MESSAGE_ID)?;
    node.set_text_content(Some(message));
    let class_list = node.class_list();
    class_list.remove_2(
        AuthMessageKind::Success.css_class(),
        AuthMessageKind::Error.css_class(),
    )?;
    class_list.add_1(kind.css_class())?;
    Ok(())
}
