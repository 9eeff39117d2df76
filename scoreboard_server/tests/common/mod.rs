use std::sync::Arc;
use std::time::Duration;

use http_types::{Body, Method, Request, Response, Url};
use serde_json::Value;

use scoreboard_server::auth::hash_password;
use scoreboard_server::change_feed::Subscribers;
use scoreboard_server::database::SqlxStore;
use scoreboard_server::file_store::FileStore;
use scoreboard_server::http_server_state::HttpServerState;
use scoreboard_server::persistence::ScoreStore;
use scoreboard_server::server_config::*;
use scoreboard_server::server_main::{build_app, make_state};


pub const ADMIN_PASSWORD: &str = "aymoon";

pub struct TestServer {
    pub app: tide::Server<HttpServerState>,
    pub state: HttpServerState,
}

pub fn config(auth_options: AuthOptions, session_options: SessionOptions) -> ServerConfig {
    ServerConfig {
        port: 3000,
        store_options: StoreOptions::Sqlite(":memory:".to_owned()),
        auth_options,
        session_options,
        static_content_dir: None,
        allowed_origin: AllowedOrigin::Any,
    }
}

pub fn open_config() -> ServerConfig { config(AuthOptions::NoAuth, SessionOptions::NoSessions) }

pub fn admin_config() -> ServerConfig {
    config(
        AuthOptions::AdminPassword {
            password_hash: StringSource::Literal(hash_password(ADMIN_PASSWORD).unwrap()),
        },
        SessionOptions::WithSessions {
            secret: StringSource::Random { len: 64 },
            expire_in: Duration::from_secs(3600),
        },
    )
}

// The directory is removed when the returned guard is dropped.
pub fn temp_scores_path() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    (dir, path)
}

pub async fn start_with_store(config: &ServerConfig, store: Arc<dyn ScoreStore>) -> TestServer {
    store.init().await.unwrap();
    let state = make_state(config, store, Arc::new(Subscribers::new())).unwrap();
    let app = build_app(Arc::clone(&state), config).unwrap();
    TestServer { app, state }
}

pub async fn start_sqlite(config: &ServerConfig) -> TestServer {
    let store = SqlxStore::<sqlx::Sqlite>::in_memory().await.unwrap();
    start_with_store(config, Arc::new(store)).await
}

pub async fn start_file(config: &ServerConfig, path: &std::path::Path) -> TestServer {
    let store = FileStore::new(path.to_path_buf());
    start_with_store(config, Arc::new(store)).await
}

fn url(path: &str) -> Url { Url::parse(&format!("http://localhost{path}")).unwrap() }

impl TestServer {
    pub async fn send(&self, req: Request) -> Response { self.app.respond(req).await.unwrap() }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        let mut req = Request::new(Method::Get, url(path));
        if let Some(cookie) = cookie {
            req.insert_header("Cookie", cookie);
        }
        self.send(req).await
    }

    pub async fn send_json(
        &self, method: Method, path: &str, body: Value, cookie: Option<&str>,
    ) -> Response {
        let mut req = Request::new(method, url(path));
        req.set_body(Body::from_json(&body).unwrap());
        if let Some(cookie) = cookie {
            req.insert_header("Cookie", cookie);
        }
        self.send(req).await
    }

    pub async fn put_score(&self, team: &str, body: Value, cookie: Option<&str>) -> Response {
        self.send_json(Method::Put, &format!("/api/scores/{team}"), body, cookie).await
    }
}

// "name=value" part of the session cookie set by the response.
pub fn session_cookie(resp: &Response) -> String {
    let set_cookie = resp.header("Set-Cookie").expect("no Set-Cookie header").last().as_str();
    set_cookie.split(';').next().unwrap().trim().to_owned()
}

pub async fn message(resp: &mut Response) -> String {
    let body: Value = resp.body_json().await.unwrap();
    body["message"].as_str().unwrap().to_owned()
}
