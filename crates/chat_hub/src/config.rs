//! Configuration management for the chat hub.
//!
//! This module handles loading, validation, and conversion of hub
//! configuration from TOML files. Command-line overrides are applied on top
//! by the application before validation.

use chat_server::ServerConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::info;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_max_connections() -> usize {
    1000
}

fn default_max_message_size() -> usize {
    4096
}

fn default_admin_password() -> String {
    "supersecretpw".to_string()
}

fn default_chat_log_enabled() -> bool {
    true
}

fn default_chat_log_path() -> String {
    "server.log".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Application configuration loaded from TOML file.
///
/// Every section and field has a default, so a partial file is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Network settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Admin credentials
    #[serde(default)]
    pub admin: AdminSettings,
    /// Chat event log
    #[serde(default)]
    pub chat_log: ChatLogSettings,
    /// Operational logging
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Server-specific configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Network address to bind the server to (e.g., "127.0.0.1:3000")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Maximum number of concurrent client connections
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Largest accepted inbound text frame, in bytes
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
}

/// Admin secret required by `/kick`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSettings {
    #[serde(default = "default_admin_password")]
    pub password: String,
}

/// Chat event log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLogSettings {
    #[serde(default = "default_chat_log_enabled")]
    pub enabled: bool,
    #[serde(default = "default_chat_log_path")]
    pub path: String,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            max_connections: default_max_connections(),
            max_message_size: default_max_message_size(),
        }
    }
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            password: default_admin_password(),
        }
    }
}

impl Default for ChatLogSettings {
    fn default() -> Self {
        Self {
            enabled: default_chat_log_enabled(),
            path: default_chat_log_path(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, writes the default configuration to `path`
    /// and returns it.
    pub async fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Replaces the port of the bind address, keeping its host.
    pub fn override_port(&mut self, port: u16) -> Result<(), String> {
        let mut addr: SocketAddr = self
            .server
            .bind_address
            .parse()
            .map_err(|_| format!("Invalid bind address: {}", self.server.bind_address))?;
        addr.set_port(port);
        self.server.bind_address = addr.to_string();
        Ok(())
    }

    /// Converts to the core server configuration.
    pub fn to_server_config(&self) -> Result<ServerConfig, Box<dyn std::error::Error>> {
        Ok(ServerConfig {
            bind_address: self.server.bind_address.parse()?,
            admin_password: self.admin.password.clone(),
            chat_log_path: self
                .chat_log
                .enabled
                .then(|| PathBuf::from(&self.chat_log.path)),
            max_connections: self.server.max_connections,
            max_message_size: self.server.max_message_size,
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.bind_address.parse::<SocketAddr>().is_err() {
            return Err(format!(
                "Invalid bind address: {}",
                &self.server.bind_address
            ));
        }

        if self.server.max_connections == 0 {
            return Err("server.max_connections must be greater than 0".to_string());
        }

        if self.server.max_message_size == 0 {
            return Err("server.max_message_size must be greater than 0".to_string());
        }

        if self.admin.password.is_empty() {
            return Err("Admin password cannot be empty".to_string());
        }

        if self.chat_log.enabled && self.chat_log.path.is_empty() {
            return Err("chat_log.path cannot be empty when the chat log is enabled".to_string());
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {VALID_LOG_LEVELS:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }
}
