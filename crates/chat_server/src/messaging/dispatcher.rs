//! Command dispatch for inbound chat lines.
//!
//! Every inbound line is classified here. Plain text becomes a chat line
//! broadcast to everyone but the sender; `/` lines are parsed into a
//! [`Command`] and executed. Command failures are answered with a single
//! reply line to the sender and never go further.

use super::command::{Command, HELP_LINES};
use super::router::Router;
use crate::chat_log::ChatLog;
use crate::connection::{ConnectionId, SessionInfo, SessionRegistry};
use crate::error::{CommandError, RegistryError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Notice delivered to a kicked session before its connection is closed.
pub const KICK_NOTICE: &str = "You have been kicked from the chat.";

/// Executes commands and routes chat on behalf of one sender at a time.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<SessionRegistry>,
    router: Router,
    chat_log: ChatLog,
    admin_password: Arc<str>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<SessionRegistry>,
        router: Router,
        chat_log: ChatLog,
        admin_password: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            registry,
            router,
            chat_log,
            admin_password: admin_password.into(),
        }
    }

    /// Handles one inbound line from `sender`.
    ///
    /// Lines from a connection that is no longer registered (for example one
    /// kicked while its message was in flight) are dropped.
    pub async fn dispatch(&self, sender: &ConnectionId, line: &str) {
        let Some(session) = self.registry.find_by_id(sender).await else {
            debug!("Ignoring line from unregistered connection {}", sender);
            return;
        };

        if !Command::is_command(line) {
            self.chat(&session, line).await;
            return;
        }

        let result = match Command::parse(line) {
            Ok(command) => self.execute(&session, command).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            debug!("Command from {} rejected: {}", session.display_name, e);
            self.router.unicast(sender, &e.to_string()).await;
        }
    }

    async fn execute(&self, session: &SessionInfo, command: Command) -> Result<(), CommandError> {
        match command {
            Command::Whisper { target, message } => self.whisper(session, &target, &message).await,
            Command::Rename { new_name } => self.rename(session, &new_name).await,
            Command::Kick { target, password } => self.kick(session, &target, &password).await,
            Command::ClientList => {
                self.client_list(session).await;
                Ok(())
            }
            Command::Commands => {
                for line in HELP_LINES {
                    self.router.unicast(&session.id, line).await;
                }
                Ok(())
            }
        }
    }

    async fn chat(&self, session: &SessionInfo, text: &str) {
        let formatted = format!("{}: {}", session.display_name, text);
        info!("💬 {}", formatted);
        self.chat_log.append(formatted.as_str());
        self.router.broadcast_except(&formatted, &session.id).await;
    }

    async fn whisper(
        &self,
        session: &SessionInfo,
        target: &str,
        message: &str,
    ) -> Result<(), CommandError> {
        if target == session.display_name {
            return Err(CommandError::SelfTarget("whisper to"));
        }

        let line = format!("Whisper from {}: {}", session.display_name, message);
        self.router
            .unicast_by_name(target, &line)
            .await
            .ok_or_else(|| CommandError::NotFound(target.to_string()))?;

        self.chat_log.append(format!(
            "Whisper from {} to {}: {}",
            session.display_name, target, message
        ));
        Ok(())
    }

    async fn rename(&self, session: &SessionInfo, new_name: &str) -> Result<(), CommandError> {
        let old_name = match self.registry.rename(&session.id, new_name).await {
            Ok(old_name) => old_name,
            Err(RegistryError::SameName) => return Err(CommandError::SameValue),
            Err(RegistryError::NameConflict(name)) => return Err(CommandError::Conflict(name)),
            Err(e) => {
                warn!("Rename for {} failed: {}", session.id, e);
                return Ok(());
            }
        };

        self.router
            .unicast(
                &session.id,
                &format!("Username successfully updated to \"{new_name}\"."),
            )
            .await;
        self.router
            .broadcast_all(&format!("{old_name} has changed their username to {new_name}."))
            .await;
        self.chat_log
            .append(format!("{old_name} changed their username to {new_name}"));
        Ok(())
    }

    async fn kick(
        &self,
        session: &SessionInfo,
        target: &str,
        password: &str,
    ) -> Result<(), CommandError> {
        if password.as_bytes() != self.admin_password.as_bytes() {
            warn!("🔐 {} supplied a wrong admin password", session.display_name);
            return Err(CommandError::Auth);
        }
        if target == session.display_name {
            return Err(CommandError::SelfTarget("kick"));
        }

        let evicted = self
            .registry
            .evict_by_name(target, KICK_NOTICE)
            .await
            .ok_or_else(|| CommandError::NotFound(target.to_string()))?;

        info!("👢 {} was kicked by {}", evicted.display_name, session.display_name);
        self.router
            .broadcast_all(&format!("{} has been kicked from the chat.", evicted.display_name))
            .await;
        self.chat_log.append(format!(
            "{} was kicked by {}",
            evicted.display_name, session.display_name
        ));
        Ok(())
    }

    async fn client_list(&self, session: &SessionInfo) {
        let names = self.registry.display_names().await.join(", ");
        self.router
            .unicast(&session.id, &format!("Connected clients: {names}"))
            .await;
        self.chat_log.append(format!("Client list requested: {names}"));
    }
}
