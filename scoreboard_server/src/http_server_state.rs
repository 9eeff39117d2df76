use std::sync::Arc;

use http_types::StatusCode;
use scoreboard::session::Session;

use crate::auth::AdminAuth;
use crate::change_feed::Subscribers;
use crate::persistence::ScoreStore;
use crate::server_config::AllowedOrigin;


pub const SESSION_KEY: &str = "session";

pub struct HttpServerStateImpl {
    pub store: Arc<dyn ScoreStore>,
    // `None` means that anybody may update scores.
    pub admin_auth: Option<AdminAuth>,
    pub sessions_enabled: bool,
    pub subscribers: Arc<Subscribers>,
    pub allowed_origin: AllowedOrigin,
}

pub type HttpServerState = Arc<HttpServerStateImpl>;

// Non-panicking version of tide::Request::session()
pub fn get_session(
    req: &tide::Request<HttpServerState>,
) -> tide::Result<&tide::sessions::Session> {
    if req.state().sessions_enabled {
        Ok(req.session())
    } else {
        Err(tide::Error::from_str(StatusCode::NotImplemented, "Sessions are not enabled."))
    }
}

// Non-panicking version of tide::Request::session_mut()
pub fn get_session_mut(
    req: &mut tide::Request<HttpServerState>,
) -> tide::Result<&mut tide::sessions::Session> {
    if req.state().sessions_enabled {
        Ok(req.session_mut())
    } else {
        Err(tide::Error::from_str(StatusCode::NotImplemented, "Sessions are not enabled."))
    }
}

pub fn current_session(req: &tide::Request<HttpServerState>) -> Session {
    get_session(req)
        .ok()
        .and_then(|s| s.get::<Session>(SESSION_KEY))
        .unwrap_or_default()
}

// Whether this request may change scores.
pub fn is_authorized(req: &tide::Request<HttpServerState>) -> bool {
    req.state().admin_auth.is_none() || current_session(req).is_logged_in()
}
