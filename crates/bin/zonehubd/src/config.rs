//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `zonehub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// State file settings.
    pub storage: StorageConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Event streaming settings.
    pub events: EventsConfig,
    /// Virtual gateways to register at startup.
    pub gateways: GatewaysConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// JSON state file configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the state document.
    pub path: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Event bus configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Queue capacity of each SSE subscriber.
    pub subscriber_capacity: usize,
}

/// The `[[gateways]]` array.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct GatewaysConfig(pub Vec<GatewayConfig>);

/// One virtual gateway.
#[derive(Debug, Deserialize)]
pub struct GatewayConfig {
    /// Unique gateway name.
    pub name: String,
    /// Number of simulated on/off devices.
    #[serde(default)]
    pub devices: usize,
}

impl Config {
    /// Load configuration from `zonehub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("zonehub.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("ZONEHUB_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("ZONEHUB_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("ZONEHUB_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("ZONEHUB_STATE_PATH") {
            self.storage.path = PathBuf::from(val);
        }
        if let Some(val) = var("ZONEHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.events.subscriber_capacity == 0 {
            return Err(ConfigError::Validation(
                "subscriber capacity must be non-zero".to_string(),
            ));
        }
        let mut names = HashSet::new();
        for gateway in &self.gateways.0 {
            if !names.insert(gateway.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "gateway name {:?} is used more than once",
                    gateway.name
                )));
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("zonehub.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,tower_http=debug".to_string(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            subscriber_capacity: zonehub_adapter_http_axum::state::DEFAULT_SUBSCRIBER_CAPACITY,
        }
    }
}

impl Default for GatewaysConfig {
    fn default() -> Self {
        Self(vec![GatewayConfig {
            name: "virtual".to_string(),
            devices: 4,
        }])
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
