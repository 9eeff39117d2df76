use std::sync::Arc;

use anyhow::Context;
use async_tungstenite::WebSocketStream;
use futures_io::{AsyncRead, AsyncWrite};
use futures_util::StreamExt;
use http_types::headers::{CONNECTION, HeaderName, HeaderValue, UPGRADE};
use log::{error, info, warn};
use tide::{Body, StatusCode};
use tungstenite::protocol;

use scoreboard::network::*;

use crate::auth::AdminAuth;
use crate::auth_handlers_tide::*;
use crate::change_feed::{Subscribers, forward_postgres_changes};
use crate::database::SqlxStore;
use crate::file_store::FileStore;
use crate::http_server_state::*;
use crate::network::{self, CommunicationError};
use crate::persistence::ScoreStore;
use crate::score_handlers_tide::*;
use crate::server_config::{AllowedOrigin, AuthOptions, ServerConfig, SessionOptions, StoreOptions};


// Cookie signing key requirement of `tide::sessions`.
const MIN_SESSION_SECRET_LEN: usize = 32;

async fn handle_connection<S: AsyncRead + AsyncWrite + Unpin + Send + Sync + 'static>(
    peer_addr: String, stream: WebSocketStream<S>, subscribers: Arc<Subscribers>,
) {
    let (mut stream_tx, mut stream_rx) = StreamExt::split(stream);
    info!("Client subscribed to changes: {}", peer_addr);

    let (events_tx, events_rx) = async_std::channel::unbounded();
    let subscriber_id = subscribers.add(events_tx, peer_addr);
    let subscribers_remover = Arc::clone(&subscribers);

    // Client -> Server. Only needed to notice the disconnect.
    let reader = async_std::task::spawn(async move {
        let err = network::drain_until_closed(&mut stream_rx).await;
        if let Some(logging_id) = subscribers_remover.remove(subscriber_id) {
            match err {
                CommunicationError::ConnectionClosed => {
                    info!("Client {} disconnected", logging_id)
                }
                err => warn!("Client {} disconnected due to read error: {:?}", logging_id, err),
            }
        }
    });

    // Server -> Client. Ends when the reader removes the subscriber and drops its sender.
    while let Ok(payload) = events_rx.recv().await {
        if let Err(err) = network::write_payload_async(&mut stream_tx, payload).await {
            if let Some(logging_id) = subscribers.remove(subscriber_id) {
                warn!("Client {} disconnected due to write error: {:?}", logging_id, err);
            }
            break;
        }
    }
    reader.cancel().await;
}

fn header_str(
    req: &tide::Request<HttpServerState>, name: impl Into<HeaderName>,
) -> Option<&str> {
    req.header(name).map(|values| values.last().as_str())
}

// Validates the websocket opening handshake and builds the "101 Switching Protocols" answer.
fn websocket_handshake_response(
    req: &tide::Request<HttpServerState>,
) -> tide::Result<http_types::Response> {
    let is_upgrade = header_str(req, UPGRADE)
        .is_some_and(|v| v.eq_ignore_ascii_case("websocket"));
    if !is_upgrade {
        return Err(tide::Error::from_str(
            StatusCode::BadRequest,
            "Expected a websocket upgrade request.",
        ));
    }
    if header_str(req, "Sec-WebSocket-Version") != Some("13") {
        return Err(tide::Error::from_str(
            StatusCode::BadRequest,
            "Unsupported websocket protocol version.",
        ));
    }
    let key = header_str(req, "Sec-WebSocket-Key").ok_or_else(|| {
        tide::Error::from_str(StatusCode::BadRequest, "Missing Sec-WebSocket-Key header.")
    })?;

    let mut resp = http_types::Response::new(StatusCode::SwitchingProtocols);
    resp.insert_header(UPGRADE, "websocket");
    resp.insert_header(CONNECTION, "Upgrade");
    resp.insert_header(
        "Sec-WebSocket-Accept",
        tungstenite::handshake::derive_accept_key(key.as_bytes()),
    );
    Ok(resp)
}

async fn handle_changes(req: tide::Request<HttpServerState>) -> tide::Result {
    if req.state().sessions_enabled {
        // Browsers send the session cookie with websocket requests from any site.
        check_origin(&req, &req.state().allowed_origin)?;
    }
    let mut resp = websocket_handshake_response(&req)?;
    let peer_addr = req.peer_addr().map_or_else(
        || Err(tide::Error::from_str(StatusCode::Forbidden, "Peer address missing")),
        |x| Ok(x.to_owned()),
    )?;
    let subscribers = Arc::clone(&req.state().subscribers);

    // http_types::Response gives the raw connection back once it's upgraded.
    let upgrade_receiver = resp.recv_upgrade().await;

    async_std::task::spawn(async move {
        if let Some(stream) = upgrade_receiver.await {
            let stream =
                WebSocketStream::from_raw_socket(stream, protocol::Role::Server, None).await;
            handle_connection(peer_addr, stream, subscribers).await;
        } else {
            error!("Never received an upgrade for client {}", peer_addr);
        }
    });
    Ok(resp.into())
}

fn cors_middleware() -> anyhow::Result<tide::security::CorsMiddleware> {
    let methods = "GET, POST, PUT, OPTIONS"
        .parse::<HeaderValue>()
        .map_err(|err| anyhow::anyhow!("Invalid CORS methods: {err}"))?;
    Ok(tide::security::CorsMiddleware::new()
        .allow_methods(methods)
        .allow_origin(tide::security::Origin::from("*"))
        .allow_credentials(false))
}

pub async fn open_store(
    options: &StoreOptions, subscribers: &Arc<Subscribers>,
) -> anyhow::Result<Arc<dyn ScoreStore>> {
    let store: Arc<dyn ScoreStore> = match options {
        StoreOptions::File(path) => {
            info!("Using scores file {}", path);
            Arc::new(FileStore::new(path.clone()))
        }
        StoreOptions::Sqlite(address) => Arc::new(
            SqlxStore::<sqlx::Sqlite>::new(address)
                .await
                .with_context(|| format!("Cannot connect to SQLite DB {address}"))?,
        ),
        StoreOptions::Postgres(address_source) => {
            let address = address_source.get()?;
            let store = SqlxStore::<sqlx::Postgres>::new(&address)
                .await
                .context("Cannot connect to Postgres DB")?;
            let listener = store.listen_for_changes().await?;
            async_std::task::spawn(forward_postgres_changes(listener, Arc::clone(subscribers)));
            Arc::new(store)
        }
    };
    store.init().await.context("Failed to initialize score store")?;
    Ok(store)
}

pub fn make_state(
    config: &ServerConfig, store: Arc<dyn ScoreStore>, subscribers: Arc<Subscribers>,
) -> anyhow::Result<HttpServerState> {
    let admin_auth = match &config.auth_options {
        AuthOptions::NoAuth => None,
        AuthOptions::AdminPassword { password_hash } => Some(AdminAuth::new(
            password_hash.get().context("Cannot read admin password hash")?,
        )?),
    };
    Ok(Arc::new(HttpServerStateImpl {
        store,
        admin_auth,
        sessions_enabled: config.session_options != SessionOptions::NoSessions,
        subscribers,
        allowed_origin: config.allowed_origin.clone(),
    }))
}

pub fn build_app(
    state: HttpServerState, config: &ServerConfig,
) -> anyhow::Result<tide::Server<HttpServerState>> {
    // Comes with cookie and request logging middleware.
    let mut app = tide::with_state(state);

    if let SessionOptions::WithSessions { secret, expire_in } = &config.session_options {
        let secret = secret.get().context("Cannot read session secret")?;
        if secret.len() < MIN_SESSION_SECRET_LEN {
            anyhow::bail!("Session secret must be at least {MIN_SESSION_SECRET_LEN} bytes long.");
        }
        app.with(
            tide::sessions::SessionMiddleware::new(
                tide::sessions::CookieStore::new(),
                secret.as_bytes(),
            )
            .with_same_site_policy(http_types::cookies::SameSite::Lax)
            .with_session_ttl(Some(*expire_in)),
        );
    }

    if config.allowed_origin == AllowedOrigin::Any {
        app.with(cors_middleware()?);
    }

    app.with(tide::utils::After(|mut res: tide::Response| async move {
        if let Some((status, message)) = res.error().map(|err| (err.status(), err.to_string())) {
            res.set_status(status);
            res.set_body(Body::from_json(&ApiMessage { message })?);
        }
        Ok(res)
    }));

    app.at(SCORES_PATH).get(handle_list_scores);
    app.at(SCORES_UPDATE_PATH).put(handle_update_score);
    app.at(CHANGES_PATH).get(handle_changes);

    app.at(AUTH_LOGIN_PATH).post(handle_login);
    app.at(AUTH_LOGOUT_PATH).post(handle_logout);
    app.at(AUTH_SESSION_PATH).get(handle_session);

    if let Some(dir) = &config.static_content_dir {
        app.at("/").serve_file(format!("{dir}/index.html"))?;
        app.at("/").serve_dir(dir)?;
    }

    Ok(app)
}

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;
    let subscribers = Arc::new(Subscribers::new());
    let store = open_store(&config.store_options, &subscribers).await?;
    let state = make_state(&config, store, subscribers)?;
    let app = build_app(state, &config)?;
    let address = format!("0.0.0.0:{}", config.port);
    info!("Scoreboard server listening on {}", address);
    app.listen(address).await.context("Failed to start the tide server")?;
    Ok(())
}
