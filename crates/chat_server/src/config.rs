//! Server configuration types and defaults.
//!
//! This module contains the core server configuration structure and the
//! default values used when the hub is started without a config file.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration structure for the chat server.
///
/// Contains the network settings, the shared admin secret used by `/kick`,
/// the chat log destination and the per-connection limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The socket address to bind the server to
    pub bind_address: SocketAddr,

    /// Admin secret compared byte-for-byte against the `/kick` password argument
    pub admin_password: String,

    /// Append-only chat log file (None disables the chat log)
    pub chat_log_path: Option<PathBuf>,

    /// Maximum number of concurrently registered sessions
    pub max_connections: usize,

    /// Maximum size of one inbound text frame in bytes
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            admin_password: "supersecretpw".to_string(),
            chat_log_path: Some(PathBuf::from("server.log")),
            max_connections: 1000,
            max_message_size: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:3000");
        assert_eq!(config.admin_password, "supersecretpw");
        assert_eq!(config.chat_log_path, Some(PathBuf::from("server.log")));
        assert_eq!(config.max_connections, 1000);
        assert_eq!(config.max_message_size, 4096);
    }
}
