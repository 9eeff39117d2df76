use log::{error, info, warn};
use tide::{Body, Response, StatusCode};

use scoreboard::client::{ACCESS_DENIED_MESSAGE, ACCESS_GRANTED_MESSAGE};
use scoreboard::session::{LoginRequest, LoginResponse, Session, SessionStatus};

use crate::http_server_state::*;
use crate::server_config::AllowedOrigin;


pub fn check_origin<T>(req: &tide::Request<T>, allowed_origin: &AllowedOrigin) -> tide::Result<()> {
    let origin = req.header(http_types::headers::ORIGIN).map_or(
        Err(tide::Error::from_str(
            StatusCode::Forbidden,
            "Failed to get Origin header of the websocket request.",
        )),
        |origins| Ok(origins.last().as_str()),
    )?;

    match allowed_origin {
        AllowedOrigin::Any => Ok(()),
        AllowedOrigin::ThisSite(this_site) => {
            if origin == this_site {
                return Ok(());
            }
            if req.url().host_str() == Some("localhost") {
                let host = req.header(http_types::headers::HOST).map_or(
                    Err(tide::Error::from_str(
                        StatusCode::Forbidden,
                        "Failed to get Host header of the localhost websocket request.",
                    )),
                    |hosts| Ok(hosts.last().as_str()),
                )?;
                if host == "localhost" || host.starts_with("localhost:") {
                    return Ok(());
                }
                return Err(tide::Error::from_str(
                    StatusCode::Forbidden,
                    "Request to localhost from non-localhost origin.",
                ));
            }
            Err(tide::Error::from_str(
                StatusCode::Forbidden,
                "Origin header on the websocket request does not match the expected host",
            ))
        }
    }
}

fn login_response(status: StatusCode, authorized: bool) -> tide::Result {
    let message = if authorized { ACCESS_GRANTED_MESSAGE } else { ACCESS_DENIED_MESSAGE };
    let mut resp = Response::new(status);
    resp.set_body(Body::from_json(&LoginResponse {
        authorized,
        message: message.to_owned(),
    })?);
    Ok(resp)
}

pub async fn handle_login(mut req: tide::Request<HttpServerState>) -> tide::Result {
    let LoginRequest { password } = req
        .body_json()
        .await
        .map_err(|err| tide::Error::from_str(StatusCode::BadRequest, err.to_string()))?;

    let Some(admin_auth) = req.state().admin_auth.clone() else {
        // Everybody is an admin when authentication is off.
        return login_response(StatusCode::Ok, true);
    };

    let password_ok = admin_auth.verify(&password).map_err(|err| {
        error!("Cannot verify admin password: {:#}", err);
        tide::Error::from_str(StatusCode::InternalServerError, "Cannot verify password.")
    })?;
    if !password_ok {
        warn!("Rejected admin login from {}", req.peer_addr().unwrap_or("unknown peer"));
        return login_response(StatusCode::Forbidden, false);
    }

    let session = get_session_mut(&mut req)?;
    // New id on privilege change: a session id seen before login must not become an admin id.
    session.regenerate();
    session.insert(SESSION_KEY, Session::LoggedIn)?;
    info!("Admin logged in from {}", req.peer_addr().unwrap_or("unknown peer"));
    login_response(StatusCode::Ok, true)
}

pub async fn handle_logout(mut req: tide::Request<HttpServerState>) -> tide::Result {
    if req.state().sessions_enabled {
        let session = get_session_mut(&mut req)?;
        let mut value = session.get::<Session>(SESSION_KEY).unwrap_or_default();
        value.logout();
        session.insert(SESSION_KEY, value)?;
    }
    let mut resp = Response::new(StatusCode::Ok);
    resp.set_body(Body::from_json(&serde_json::json!({ "message": "You are now logged out." }))?);
    Ok(resp)
}

pub async fn handle_session(req: tide::Request<HttpServerState>) -> tide::Result {
    let mut resp = Response::new(StatusCode::Ok);
    resp.set_body(Body::from_json(&SessionStatus { authorized: is_authorized(&req) })?);
    Ok(resp)
}
