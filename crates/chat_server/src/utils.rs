//! Utility functions and helper methods for the chat server.
//!
//! This module provides convenient factory functions for creating server
//! instances with different configurations.

use crate::{config::ServerConfig, server::ChatServer};

/// Creates a new chat server with default configuration.
///
/// # Example
///
/// ```rust
/// # #[tokio::main]
/// # async fn main() {
/// use chat_server::create_server;
///
/// let server = create_server();
/// # }
/// ```
pub fn create_server() -> ChatServer {
    ChatServer::new(ServerConfig::default())
}

/// Creates a new chat server with custom configuration.
///
/// # Example
///
/// ```rust
/// # #[tokio::main]
/// # async fn main() {
/// use chat_server::{create_server_with_config, ServerConfig};
///
/// let config = ServerConfig {
///     bind_address: "0.0.0.0:9000".parse().unwrap(),
///     admin_password: "correct horse".to_string(),
///     chat_log_path: None,
///     ..Default::default()
/// };
///
/// let server = create_server_with_config(config);
/// # }
/// ```
pub fn create_server_with_config(config: ServerConfig) -> ChatServer {
    ChatServer::new(config)
}
