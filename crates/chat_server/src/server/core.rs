//! Core chat server implementation.
//!
//! This module contains the `ChatServer` struct, which owns the session
//! registry, the lifecycle controller and the chat log, binds the listener
//! and runs the accept loop until shutdown.

use crate::{
    chat_log::ChatLog,
    config::ServerConfig,
    connection::SessionRegistry,
    error::ServerError,
    lifecycle::LifecycleController,
    server::handlers::handle_connection,
    shutdown::ShutdownState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// The core chat server structure.
///
/// # Architecture
///
/// * **Session Registry**: Shared map of connection id to session
/// * **Lifecycle Controller**: Connect, message and disconnect handling
/// * **Chat Log**: Append-only trace of chat events
/// * **Accept Loop**: One task per accepted WebSocket connection
#[derive(Debug)]
pub struct ChatServer {
    /// Server configuration parameters
    config: Arc<ServerConfig>,

    /// Registry of connected sessions
    registry: Arc<SessionRegistry>,

    /// Transport event entry point
    lifecycle: Arc<LifecycleController>,

    /// Stop flag awaited by the accept loop
    shutdown: ShutdownState,
}

impl ChatServer {
    /// Creates a new chat server with the specified configuration.
    ///
    /// Opens the chat log if a path is configured, so this must be called
    /// inside a Tokio runtime.
    pub fn new(config: ServerConfig) -> Self {
        let chat_log = match &config.chat_log_path {
            Some(path) => ChatLog::file(path),
            None => ChatLog::disabled(),
        };
        Self::with_chat_log(config, chat_log)
    }

    /// Creates a new chat server that writes its chat log to `chat_log`.
    pub fn with_chat_log(config: ServerConfig, chat_log: ChatLog) -> Self {
        let registry = Arc::new(SessionRegistry::with_limit(config.max_connections));
        let lifecycle = Arc::new(LifecycleController::new(
            registry.clone(),
            chat_log,
            config.admin_password.as_str(),
        ));

        Self {
            config: Arc::new(config),
            registry,
            lifecycle,
            shutdown: ShutdownState::new(),
        }
    }

    /// Creates the TCP listener for the configured bind address.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let listener = TcpListener::bind(self.config.bind_address)
            .await
            .map_err(|e| {
                ServerError::Network(format!("Failed to bind {}: {e}", self.config.bind_address))
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::Network(e.to_string()))?;
        info!("🚀 Chat server listening on ws://{}", local_addr);
        Ok(listener)
    }

    /// Runs the accept loop on an already bound listener until
    /// [`ChatServer::shutdown`] is called.
    ///
    /// Open connections are not touched; they end on their own.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        let lifecycle = self.lifecycle.clone();
                        let config = self.config.clone();

                        // Spawn individual connection handler
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, addr, lifecycle, config).await {
                                error!("Connection error from {}: {}", addr, e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                        return Err(ServerError::Network(e.to_string()));
                    }
                },
                _ = self.shutdown.wait() => {
                    info!("🛑 Accept loop stopping - shutdown initiated");
                    break;
                }
            }
        }

        debug!("🧹 Flushing chat log");
        self.lifecycle.chat_log().flush().await;
        info!("Server stopped");
        Ok(())
    }

    /// Stops the accept loop. Safe to call more than once.
    pub fn shutdown(&self) {
        self.shutdown.initiate_shutdown();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_shutdown_initiated()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn registry(&self) -> Arc<SessionRegistry> {
        self.registry.clone()
    }

    pub fn chat_log(&self) -> ChatLog {
        self.lifecycle.chat_log().clone()
    }
}
