// Paths and constants shared by the server and the clients.

pub const DEFAULT_PORT: u16 = 3000;

pub const SCORES_PATH: &str = "/api/scores";
pub const SCORES_UPDATE_PATH: &str = "/api/scores/:team_number";
pub const CHANGES_PATH: &str = "/api/changes";

pub const AUTH_LOGIN_PATH: &str = "/auth/login";
pub const AUTH_LOGOUT_PATH: &str = "/auth/logout";
pub const AUTH_SESSION_PATH: &str = "/auth/session";

pub fn scores_update_path(team_number: i64) -> String { format!("{SCORES_PATH}/{team_number}") }
