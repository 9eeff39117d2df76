use serde::{Deserialize, Serialize};


#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn,
}

impl Session {
    pub fn is_logged_in(self) -> bool { self == Session::LoggedIn }
    pub fn logout(&mut self) { *self = Session::LoggedOut; }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub authorized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub authorized: bool,
    pub message: String,
}
