//! Notifier configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::AuthToken;
use crate::error::NotifierError;

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Top-level notifier configuration.
///
/// Loaded once at startup via [`NotifierConfig::from_env`].
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Socket address of the local UI surface (e.g. `127.0.0.1:3030`).
    pub listen_addr: SocketAddr,

    /// Marketplace backend base URL, without trailing slash.
    pub backend_base_url: String,

    /// Token to start a session with at boot, if any.
    pub auth_token: Option<AuthToken>,

    /// Seconds between polling ticks (at least 1).
    pub poll_interval_secs: u64,

    /// Per-request timeout for backend calls.
    pub http_timeout_secs: u64,

    /// Master switch for the on-disk notification store.
    pub persistence_enabled: bool,

    /// Directory holding one JSON file per session key.
    pub store_dir: PathBuf,

    /// Key of the notification list restored at boot and used for the
    /// `AUTH_TOKEN` session.
    pub session_key: String,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Log output format.
    pub log_format: LogFormat,
}

impl NotifierConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Config`] if `LISTEN_ADDR` cannot be parsed
    /// as a [`SocketAddr`] or `BACKEND_BASE_URL` is not an http(s) URL.
    pub fn from_env() -> Result<Self, NotifierError> {
        dotenvy::dotenv().ok();

        let listen_addr = parse_listen_addr(
            &std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:3030".to_string()),
        )?;
        let backend_base_url = parse_base_url(
            &std::env::var("BACKEND_BASE_URL")
                .unwrap_or_else(|_| "https://localhost:7056".to_string()),
        )?;
        let auth_token = std::env::var("AUTH_TOKEN").ok().and_then(AuthToken::new);

        let poll_interval_secs = parse_env("POLL_INTERVAL_SECS", 30_u64).max(1);
        let http_timeout_secs = parse_env("HTTP_TIMEOUT_SECS", 10_u64).max(1);

        let persistence_enabled = parse_env_bool("PERSISTENCE_ENABLED", true);
        let store_dir = PathBuf::from(
            std::env::var("NOTIFICATION_STORE_DIR").unwrap_or_else(|_| ".bid-notifier".to_string()),
        );
        let session_key = std::env::var("SESSION_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| "default".to_string());

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 1024);
        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            listen_addr,
            backend_base_url,
            auth_token,
            poll_interval_secs,
            http_timeout_secs,
            persistence_enabled,
            store_dir,
            session_key,
            event_bus_capacity,
            log_format,
        })
    }

    /// Polling interval as a [`Duration`].
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Backend request timeout as a [`Duration`].
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_listen_addr(raw: &str) -> Result<SocketAddr, NotifierError> {
    raw.parse()
        .map_err(|e| NotifierError::Config(format!("invalid LISTEN_ADDR '{raw}': {e}")))
}

fn parse_base_url(raw: &str) -> Result<String, NotifierError> {
    let url = reqwest::Url::parse(raw)
        .map_err(|e| NotifierError::Config(format!("invalid BACKEND_BASE_URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(raw.trim_end_matches('/').to_string()),
        other => Err(NotifierError::Config(format!(
            "BACKEND_BASE_URL must be http or https, got '{other}'"
        ))),
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn listen_addr_must_parse() {
        let Ok(addr) = parse_listen_addr("127.0.0.1:3030") else {
            panic!("valid address rejected");
        };
        assert_eq!(addr.port(), 3030);
        let Err(err) = parse_listen_addr("localhost") else {
            panic!("invalid address accepted");
        };
        assert_eq!(err.error_code(), NotifierError::Config(String::new()).error_code());
    }

    #[test]
    fn base_url_is_validated_and_trimmed() {
        let Ok(url) = parse_base_url("https://localhost:7056/") else {
            panic!("valid url rejected");
        };
        assert_eq!(url, "https://localhost:7056");
        assert!(parse_base_url("ftp://example.test").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        assert_eq!(parse_env("BID_NOTIFIER_TEST_SURELY_UNSET", 42_u64), 42);
        assert!(parse_env_bool("BID_NOTIFIER_TEST_SURELY_UNSET", true));
    }
}
