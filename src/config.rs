//! Client configuration resolved at build time.
//!
//! The WASM bundle has no process environment at runtime, so values are
//! captured with `option_env!` when the crate is compiled:
//!
//! - `TALENT_MATCH_API_URL`: account API base URL
//! - `TALENT_MATCH_TIMEOUT_MS`: per-request timeout
//! - `TALENT_MATCH_LOG`: console log level (`error` .. `trace`)

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;
const MIN_TIMEOUT_MS: u32 = 1_000;
const MAX_TIMEOUT_MS: u32 = 60_000;

/// Console log verbosity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Matching `log` crate level for the console logger.
    #[must_use]
    pub fn to_log_level(self) -> log::Level {
        match self {
            Self::Error => log::Level::Error,
            Self::Warn => log::Level::Warn,
            Self::Info => log::Level::Info,
            Self::Debug => log::Level::Debug,
            Self::Trace => log::Level::Trace,
        }
    }
}

/// Settings shared through context by the API client and the app shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash.
    pub api_base_url: String,
    /// Upper bound on any single request; expiry surfaces as `ApiError::Timeout`.
    pub request_timeout_ms: u32,
    pub log_level: LogLevel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            log_level: LogLevel::default(),
        }
    }
}

impl ClientConfig {
    /// Load from the build-time environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("TALENT_MATCH_API_URL"),
            option_env!("TALENT_MATCH_TIMEOUT_MS"),
            option_env!("TALENT_MATCH_LOG"),
        )
    }

    /// Build from raw optional values, falling back to defaults for anything
    /// missing or unparseable.
    #[must_use]
    pub fn from_values(base_url: Option<&str>, timeout_ms: Option<&str>, log_level: Option<&str>) -> Self {
        let api_base_url = base_url
            .map(normalize_base_url)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let request_timeout_ms = timeout_ms.and_then(parse_timeout).unwrap_or(DEFAULT_TIMEOUT_MS);
        let log_level = log_level.and_then(LogLevel::from_name).unwrap_or_default();
        Self { api_base_url, request_timeout_ms, log_level }
    }

    /// Absolute URL for an API path such as `/accounts/me`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.api_base_url)
    }
}

fn parse_timeout(raw: &str) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(ms) => Some(ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS)),
        Err(_) => None,
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}
