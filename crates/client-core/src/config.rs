use std::path::Path;

use bluffline_infra_common::LoggingConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Default coordinator endpoint
pub const DEFAULT_COORDINATOR_URL: &str = "ws://127.0.0.1:8080/call";

/// Configuration for a participant client
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```toml
/// coordinator_url = "wss://game.example.org/call"
/// display_name = "alice"
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket URL of the coordination point
    pub coordinator_url: String,
    /// Register with this name as soon as the client starts
    pub display_name: Option<String>,
    /// Capacity of the command queue into the session task
    pub command_buffer: usize,
    /// Capacity of the event broadcast channel
    pub event_buffer: usize,
    /// Logging setup used by binaries embedding the client
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    /// Create a new client configuration with defaults
    pub fn new() -> Self {
        Self {
            coordinator_url: DEFAULT_COORDINATOR_URL.to_string(),
            display_name: None,
            command_buffer: 32,
            event_buffer: 256,
            logging: LoggingConfig::default(),
        }
    }

    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> ClientResult<Self> {
        let config: Self = bluffline_infra_common::config::load_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> ClientResult<Self> {
        let config: Self = bluffline_infra_common::config::parse_toml(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_coordinator_url(mut self, url: impl Into<String>) -> Self {
        self.coordinator_url = url.into();
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_command_buffer(mut self, capacity: usize) -> Self {
        self.command_buffer = capacity;
        self
    }

    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }

    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Check the configuration before starting a client
    pub fn validate(&self) -> ClientResult<()> {
        let url = url::Url::parse(&self.coordinator_url)
            .map_err(|e| ClientError::invalid_config("coordinator_url", e.to_string()))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(ClientError::invalid_config(
                "coordinator_url",
                format!("unsupported scheme '{}', expected ws or wss", url.scheme()),
            ));
        }
        if self.command_buffer == 0 {
            return Err(ClientError::invalid_config("command_buffer", "must be greater than zero"));
        }
        if self.event_buffer == 0 {
            return Err(ClientError::invalid_config("event_buffer", "must be greater than zero"));
        }
        if matches!(&self.display_name, Some(name) if name.trim().is_empty()) {
            return Err(ClientError::invalid_config("display_name", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.coordinator_url, DEFAULT_COORDINATOR_URL);
    }

    #[test]
    fn test_from_toml_keeps_defaults() {
        let config = ClientConfig::from_toml(
            r#"
            coordinator_url = "wss://game.example.org/call"
            display_name = "alice"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.coordinator_url, "wss://game.example.org/call");
        assert_eq!(config.display_name.as_deref(), Some("alice"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.event_buffer, 256);
    }

    #[test]
    fn test_rejects_http_urls() {
        let err = ClientConfig::new()
            .with_coordinator_url("http://example.org/call")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfiguration { ref field, .. } if field == "coordinator_url"));
    }

    #[test]
    fn test_rejects_zero_buffers_and_blank_name() {
        assert!(ClientConfig::new().with_event_buffer(0).validate().is_err());
        assert!(ClientConfig::new().with_command_buffer(0).validate().is_err());
        assert!(ClientConfig::new().with_display_name("  ").validate().is_err());
    }

    #[test]
    fn test_bad_toml_is_a_config_error() {
        let err = ClientConfig::from_toml("event_buffer = \"lots\"").unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
