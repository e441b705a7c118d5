//! Service configuration with validation.
//!
//! Resolved once at process startup: defaults, then an optional JSON file,
//! then environment overrides.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables read by [`ServiceConfig::apply_env`].
pub mod env {
    pub const CONFIG_PATH: &str = "WL_API_CONFIG";
    pub const HOST: &str = "WL_API_HOST";
    pub const PORT: &str = "WL_API_PORT";
    pub const SOURCES_TABLE_NAME: &str = "SOURCES_TABLE_NAME";
    pub const SOURCES_SEED_PATH: &str = "SOURCES_SEED_PATH";
    pub const QUEUE_URL: &str = "UPDATE_FROM_SOURCE_QUEUE_URL";
    pub const IDENTITY_USERINFO_URL: &str = "IDENTITY_USERINFO_URL";
    pub const IDENTITY_STATIC_TOKENS: &str = "IDENTITY_STATIC_TOKENS";
}

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Source registry configuration
    pub registry: RegistryConfig,
    /// Update queue configuration
    pub queue: QueueConfig,
    /// Identity provider configuration
    pub identity: IdentityConfig,
}

impl ServiceConfig {
    /// Load from `WL_API_CONFIG` (if set) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(env::CONFIG_PATH) {
            Ok(path) if !path.is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. Missing sections fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(env::HOST) {
            self.http.host = host
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{} is not an IP address", env::HOST)))?;
        }
        if let Some(port) = lookup(env::PORT) {
            self.http.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{} is not a port", env::PORT)))?;
        }
        if let Some(table) = lookup(env::SOURCES_TABLE_NAME) {
            self.registry.table_name = table;
        }
        if let Some(seed) = lookup(env::SOURCES_SEED_PATH).filter(|s| !s.is_empty()) {
            self.registry.seed_path = Some(PathBuf::from(seed));
        }
        if let Some(url) = lookup(env::QUEUE_URL).filter(|s| !s.is_empty()) {
            self.queue.url = Some(url);
        }
        if let Some(url) = lookup(env::IDENTITY_USERINFO_URL).filter(|s| !s.is_empty()) {
            self.identity.userinfo_url = Some(url);
        }
        if let Some(tokens) = lookup(env::IDENTITY_STATIC_TOKENS) {
            self.identity.static_tokens = tokens
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry.table_name.trim().is_empty() {
            return Err(ConfigError::MissingTableName);
        }

        if self.queue.name.trim().is_empty() {
            return Err(ConfigError::Invalid("queue name cannot be empty".into()));
        }

        if self.queue.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("queue timeout cannot be 0".into()));
        }

        if self.identity.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "identity timeout cannot be 0".into(),
            ));
        }

        if let Some(url) = &self.queue.url {
            validate_http_url("queue.url", url)?;
        }

        if let Some(url) = &self.identity.userinfo_url {
            validate_http_url("identity.userinfo_url", url)?;
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

fn validate_http_url(field: &str, raw: &str) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", field, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl(format!(
            "{}: unsupported scheme {}",
            field, other
        ))),
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8080)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
        }
    }
}

/// Source registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Name of the table holding source records
    pub table_name: String,
    /// JSON array of source records loaded at startup
    pub seed_path: Option<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            table_name: "sources".to_string(),
            seed_path: None,
        }
    }
}

/// Update queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Queue endpoint. `None` publishes to the in-process command bus.
    pub url: Option<String>,
    /// Queue name stamped on in-process envelopes
    pub name: String,
    /// Publish request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            url: None,
            name: shared_bus::DEFAULT_QUEUE_NAME.to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Identity provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Userinfo endpoint resolving an access token to a user.
    /// `None` falls back to `static_tokens`.
    pub userinfo_url: Option<String>,
    /// Tokens accepted without a provider (development only)
    pub static_tokens: Vec<String>,
    /// Verification request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            userinfo_url: None,
            static_tokens: Vec::new(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config: {0}")]
    Io(String),
    /// Config file is not valid JSON for this schema
    #[error("cannot parse config: {0}")]
    Parse(String),
    /// No registry table configured
    #[error("source registry table name is required")]
    MissingTableName,
    /// Malformed or unsupported URL
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Duration serde as `"5s"`, `"250ms"`, `"2m"` or plain seconds.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" must be checked before "s" and "m".
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .ok()
                .and_then(|m| m.checked_mul(60))
                .map(Duration::from_secs)
                .ok_or("invalid minutes")
        } else {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
