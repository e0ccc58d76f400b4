//! Connection configuration (C11, SPEC_FULL.md §4.11, §6.3).
//!
//! Mirrors the teacher's `Config::from_env()` convenience alongside plain
//! struct-literal construction, generalized to the recognized option set in
//! §6.3 rather than this crate's own deployment env vars.

use std::env;

/// `OneTime` ⇒ close the socket after each completed request (§4.3);
/// `LongRunning` ⇒ keep it open across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionType {
    OneTime,
    LongRunning,
}

/// Advisory diagnostic verbosity (§6.3). A library cannot install its own
/// global subscriber, so this is carried as data for the caller to wire
/// into their own `tracing_subscriber::EnvFilter` rather than acted on
/// directly — see SPEC_FULL.md §4.10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// The bridge's recognized connection options (§6.3).
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub tls: bool,
    pub max_payload: usize,
    pub interaction_type: InteractionType,
    pub log_level: LogLevel,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            host: "localhost".into(),
            port: 1337,
            tls: false,
            max_payload: 128 * 1024 * 1024,
            interaction_type: InteractionType::OneTime,
            log_level: LogLevel::Debug,
        }
    }
}

impl ConnectionConfig {
    /// Load from `OGMIOS_HOST`/`OGMIOS_PORT`/`OGMIOS_TLS`/`OGMIOS_INTERACTION_TYPE`,
    /// falling back to [`ConnectionConfig::default`] for anything unset or
    /// unparseable — the same `env::var(...).unwrap_or_else(...)` idiom the
    /// teacher uses for its own deployment configuration.
    pub fn from_env() -> Self {
        let defaults = ConnectionConfig::default();
        ConnectionConfig {
            host: env::var("OGMIOS_HOST").unwrap_or(defaults.host),
            port: env::var("OGMIOS_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            tls: env::var("OGMIOS_TLS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.tls),
            max_payload: defaults.max_payload,
            interaction_type: match env::var("OGMIOS_INTERACTION_TYPE").as_deref() {
                Ok("LongRunning") => InteractionType::LongRunning,
                _ => defaults.interaction_type,
            },
            log_level: defaults.log_level,
        }
    }

    pub fn http_base_url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }

    pub fn ws_url(&self) -> String {
        let scheme = if self.tls { "wss" } else { "ws" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = ConnectionConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 1337);
        assert!(!config.tls);
        assert_eq!(config.max_payload, 128 * 1024 * 1024);
        assert_eq!(config.interaction_type, InteractionType::OneTime);
    }

    #[test]
    fn urls_reflect_tls_setting() {
        let mut config = ConnectionConfig::default();
        assert_eq!(config.ws_url(), "ws://localhost:1337");
        config.tls = true;
        assert_eq!(config.ws_url(), "wss://localhost:1337");
        assert_eq!(config.http_base_url(), "https://localhost:1337");
    }
}
