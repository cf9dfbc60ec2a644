//! Main application logic and lifecycle management.
//!
//! This module contains the `Application` struct that orchestrates server
//! startup, waits for termination signals and drives the graceful shutdown.

use crate::{
    cli::CliArgs,
    config::AppConfig,
    logging::display_banner,
    signals::wait_for_termination,
};
use chat_server::ChatServer;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// How long the accept loop gets to wind down after a shutdown signal.
const SERVER_STOP_TIMEOUT: Duration = Duration::from_secs(8);

/// Main application struct.
///
/// # Architecture
///
/// * **Configuration Management**: Loads and validates configuration from files and CLI
/// * **Server Orchestration**: Owns the chat server instance
/// * **Graceful Shutdown**: Handles termination signals and flushes the chat log
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
    /// Chat server instance
    server: Arc<ChatServer>,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// # Process
    ///
    /// 1. Load configuration from file (creating default if missing)
    /// 2. Apply command-line argument overrides
    /// 3. Validate merged configuration
    /// 4. Display startup banner
    /// 5. Initialize the chat server with the configuration
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;

        apply_overrides(&mut config, &args)?;

        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        } else {
            info!("✅ Configuration loaded and validated successfully");
        }

        display_banner();

        let server_config = config.to_server_config()?;
        let server = Arc::new(ChatServer::new(server_config));

        Ok(Self { config, server })
    }

    /// Runs the application until a shutdown signal arrives.
    ///
    /// A second signal while shutting down exits the process immediately.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        info!("🌟 Starting Chat Hub");
        self.log_configuration_summary();

        let listener = self.server.bind().await?;

        let server_handle = {
            let server = self.server.clone();
            tokio::spawn(async move {
                match server.serve(listener).await {
                    Ok(()) => info!("✅ Server completed successfully"),
                    Err(e) => {
                        error!("❌ Server error: {:?}", e);
                        std::process::exit(1);
                    }
                }
            })
        };

        self.server.chat_log().append("Server started.");
        info!("✅ Chat Hub is now running!");
        info!("🛑 Press Ctrl+C to gracefully shutdown");

        let signal_name = wait_for_termination().await?;
        info!("📡 Received {} - initiating graceful shutdown", signal_name);

        // merciless shutdown
        tokio::spawn(async move {
            match wait_for_termination().await {
                Ok(signal_name) => {
                    warn!("{} received again! I'll make this quick.", signal_name);
                    std::process::exit(1);
                }
                Err(e) => error!("Failed to set up merciless shutdown signal handler: {e}"),
            }
        });

        self.server.shutdown();

        match tokio::time::timeout(SERVER_STOP_TIMEOUT, server_handle).await {
            Ok(_) => info!("✅ Server task completed gracefully"),
            Err(_) => warn!("⏰ Server task did not complete within timeout, proceeding"),
        }

        // Covers the timeout path, where the accept loop never got to flush
        self.server.chat_log().flush().await;

        info!(
            "👋 Chat Hub shutdown complete ({} sessions were still connected)",
            self.server.registry().len().await
        );
        Ok(())
    }

    fn log_configuration_summary(&self) {
        info!("📋 Configuration Summary:");
        info!("  🌐 Bind address: {}", self.config.server.bind_address);
        info!("  👥 Max connections: {}", self.config.server.max_connections);
        info!("  📏 Max message size: {} bytes", self.config.server.max_message_size);
        if self.config.chat_log.enabled {
            info!("  📝 Chat log: {}", self.config.chat_log.path);
        } else {
            info!("  📝 Chat log: disabled");
        }
    }
}

/// Applies command-line overrides on top of the loaded file configuration.
///
/// `--port` is applied after `--bind`, so it replaces the port of either.
pub(crate) fn apply_overrides(config: &mut AppConfig, args: &CliArgs) -> Result<(), String> {
    if let Some(bind_address) = &args.bind_address {
        config.server.bind_address = bind_address.clone();
    }

    if let Some(port) = args.port {
        config.override_port(port)?;
    }

    if let Some(password) = &args.admin_password {
        config.admin.password = password.clone();
    }

    if let Some(path) = &args.chat_log {
        config.chat_log.enabled = true;
        config.chat_log.path = path.to_string_lossy().to_string();
    }

    if let Some(log_level) = &args.log_level {
        config.logging.level = log_level.clone();
    }

    if args.json_logs {
        config.logging.json_format = true;
    }

    Ok(())
}
