use std::time::Duration;

use anyhow::Context;
use rand::Rng;
use serde::{Deserialize, Serialize};


#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum StringSource {
    Random { len: usize },
    Literal(String),
    EnvVar(String),
    File(String),
}

impl StringSource {
    pub fn get(&self) -> anyhow::Result<String> {
        match self {
            Self::Random { len } => Ok(rand::rng()
                .sample_iter(rand::distr::Alphanumeric)
                .take(*len)
                .map(char::from)
                .collect()),
            Self::Literal(s) => Ok(s.clone()),
            Self::EnvVar(v) => {
                std::env::var(v).context(format!("Missing environment variable '{v}'."))
            }
            Self::File(f) => std::fs::read_to_string(f)
                .map(|s| s.trim_end().to_owned())
                .context(format!("Failed to read file '{f}'.")),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum StoreOptions {
    // Pretty-printed JSON array of `{teamNumber, score}` records.
    File(String),
    Sqlite(String),
    // Connection string source, normally `EnvVar("DATABASE_URL")`.
    Postgres(StringSource),
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum AuthOptions {
    // Anybody may update scores.
    NoAuth,
    // Score updates require a session that logged in with the admin password.
    // The source yields an argon2 PHC string, see the `hash-password` command.
    AdminPassword { password_hash: StringSource },
}

#[derive(Debug, Eq, PartialEq, Serialize, Deserialize, Clone)]
pub enum SessionOptions {
    NoSessions,

    WithSessions {
        // When the secret is preserved, client-side sessions survive server
        // restarts. When Random is used, or the secret changes,
        // the sessions are terminated.
        secret: StringSource,
        #[serde(with = "humantime_serde")]
        expire_in: Duration,
    },
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum AllowedOrigin {
    // Also enables permissive CORS headers on the API.
    Any,
    ThisSite(String),
}

fn default_port() -> u16 { scoreboard::network::DEFAULT_PORT }

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    pub store_options: StoreOptions,
    pub auth_options: AuthOptions,
    pub session_options: SessionOptions,
    // Directory with `index.html` and the rest of the page. Not served when absent.
    #[serde(default)]
    pub static_content_dir: Option<String>,
    pub allowed_origin: AllowedOrigin,
}

impl ServerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.auth_options != AuthOptions::NoAuth
            && self.session_options == SessionOptions::NoSessions
        {
            anyhow::bail!("Authentication is enabled while sessions are not.");
        }
        Ok(())
    }
}

// Enums are written as single-key maps (`File: scores.json`) or plain strings for unit
// variants (`NoAuth`), not as YAML tags.
pub fn parse_config(contents: &str) -> anyhow::Result<ServerConfig> {
    let config: ServerConfig = serde_yaml::with::singleton_map_recursive::deserialize(
        serde_yaml::Deserializer::from_str(contents),
    )?;
    Ok(config)
}

pub fn read_config_file(filename: &str) -> anyhow::Result<ServerConfig> {
    let contents = std::fs::read_to_string(filename)
        .with_context(|| format!("Reading config file '{filename}'"))?;
    let config = parse_config(&contents)
        .with_context(|| format!("Parsing config file '{filename}'"))?;
    config.validate()?;
    Ok(config)
}


#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_full_config() {
        let config = parse_config(indoc! {"
            port: 8080
            store_options:
              Postgres:
                EnvVar: DATABASE_URL
            auth_options:
              AdminPassword:
                password_hash:
                  File: /etc/scoreboard/admin.hash
            session_options:
              WithSessions:
                secret:
                  Random:
                    len: 64
                expire_in: 30days
            static_content_dir: www
            allowed_origin:
              ThisSite: https://scores.example.com
        "})
        .unwrap();
        assert_eq!(config, ServerConfig {
            port: 8080,
            store_options: StoreOptions::Postgres(StringSource::EnvVar("DATABASE_URL".to_owned())),
            auth_options: AuthOptions::AdminPassword {
                password_hash: StringSource::File("/etc/scoreboard/admin.hash".to_owned()),
            },
            session_options: SessionOptions::WithSessions {
                secret: StringSource::Random { len: 64 },
                expire_in: Duration::from_secs(30 * 24 * 60 * 60),
            },
            static_content_dir: Some("www".to_owned()),
            allowed_origin: AllowedOrigin::ThisSite("https://scores.example.com".to_owned()),
        });
        config.validate().unwrap();
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = parse_config(indoc! {"
            store_options:
              File: scores.json
            auth_options: NoAuth
            session_options: NoSessions
            allowed_origin: Any
        "})
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.static_content_dir, None);
        assert_eq!(config.store_options, StoreOptions::File("scores.json".to_owned()));
        config.validate().unwrap();
    }

    #[test]
    fn auth_requires_sessions() {
        let config = ServerConfig {
            port: 3000,
            store_options: StoreOptions::Sqlite("scores.db".to_owned()),
            auth_options: AuthOptions::AdminPassword {
                password_hash: StringSource::Literal("hash".to_owned()),
            },
            session_options: SessionOptions::NoSessions,
            static_content_dir: None,
            allowed_origin: AllowedOrigin::Any,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn read_config_file_parses_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.yaml");
        std::fs::write(&good, indoc! {"
            port: 3001
            store_options:
              Sqlite: scores.db
            auth_options: NoAuth
            session_options: NoSessions
            allowed_origin:
              ThisSite: http://localhost:3001
        "})
        .unwrap();
        let config = read_config_file(good.to_str().unwrap()).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.store_options, StoreOptions::Sqlite("scores.db".to_owned()));

        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, indoc! {"
            store_options:
              File: scores.json
            auth_options:
              AdminPassword:
                password_hash:
                  EnvVar: ADMIN_HASH
            session_options: NoSessions
            allowed_origin: Any
        "})
        .unwrap();
        assert!(read_config_file(bad.to_str().unwrap()).is_err());
        assert!(read_config_file(dir.path().join("missing.yaml").to_str().unwrap()).is_err());
    }

    #[test]
    fn string_sources() {
        assert_eq!(StringSource::Literal("abc".to_owned()).get().unwrap(), "abc");
        let random = StringSource::Random { len: 40 }.get().unwrap();
        assert_eq!(random.len(), 40);
        assert!(random.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(StringSource::EnvVar("SCOREBOARD_SURELY_UNSET_VARIABLE".to_owned()).get().is_err());
        assert!(StringSource::File("/nonexistent/scoreboard/secret".to_owned()).get().is_err());
    }
}
