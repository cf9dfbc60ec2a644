//! Connection lifecycle controller.
//!
//! Drives each connection through `connected -> active -> disconnected`.
//! A kick ends a session early by removing it from the registry and closing
//! its transport; the disconnect event that follows finds nothing to remove
//! and stays silent, so exactly one departure is ever announced.

use crate::chat_log::ChatLog;
use crate::connection::{ConnectionId, Outbound, SessionInfo, SessionRegistry};
use crate::error::RegistryError;
use crate::messaging::{Dispatcher, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

/// Entry point for transport events.
#[derive(Debug, Clone)]
pub struct LifecycleController {
    registry: Arc<SessionRegistry>,
    router: Router,
    dispatcher: Dispatcher,
    chat_log: ChatLog,
}

impl LifecycleController {
    pub fn new(
        registry: Arc<SessionRegistry>,
        chat_log: ChatLog,
        admin_password: impl Into<Arc<str>>,
    ) -> Self {
        let router = Router::new(registry.clone());
        let dispatcher = Dispatcher::new(
            registry.clone(),
            router.clone(),
            chat_log.clone(),
            admin_password,
        );
        Self {
            registry,
            router,
            dispatcher,
            chat_log,
        }
    }

    /// Registers a new connection, welcomes it and announces it to the others.
    ///
    /// # Errors
    ///
    /// `RegistryError::DuplicateConnection` if the transport reused an id,
    /// `RegistryError::Full` if the session limit is reached. Nothing is
    /// announced in either case.
    pub async fn on_connect(
        &self,
        connection_id: ConnectionId,
        outbound: Outbound,
        remote_addr: Option<SocketAddr>,
    ) -> Result<SessionInfo, RegistryError> {
        let session = self
            .registry
            .register(connection_id, outbound, remote_addr)
            .await?;

        match session.remote_addr {
            Some(addr) => info!("👋 {} connected from {}.", session.display_name, addr),
            None => info!("👋 {} connected.", session.display_name),
        }
        self.chat_log.append(format!("{} connected.", session.display_name));

        self.router
            .unicast(&session.id, &format!("Welcome, {}!", session.display_name))
            .await;
        self.router
            .broadcast_except(
                &format!("{} has joined the chat.", session.display_name),
                &session.id,
            )
            .await;
        Ok(session)
    }

    /// Hands one inbound text line to the dispatcher.
    pub async fn on_message(&self, connection_id: &ConnectionId, text: &str) {
        self.dispatcher.dispatch(connection_id, text).await;
    }

    /// Retires a connection.
    ///
    /// Returns the removed session, or `None` when it was already gone
    /// (kicked), in which case nothing is logged or announced.
    pub async fn on_disconnect(&self, connection_id: &ConnectionId) -> Option<SessionInfo> {
        let Some(session) = self.registry.unregister(connection_id).await else {
            debug!("Connection {} already removed, no departure to announce", connection_id);
            return None;
        };

        let online = session.connected_at.elapsed().unwrap_or_default();
        info!(
            "👋 {} disconnected after {:.1}s.",
            session.display_name,
            online.as_secs_f64()
        );
        self.chat_log
            .append(format!("{} disconnected.", session.display_name));
        self.router
            .broadcast_all(&format!("{} has left the chat.", session.display_name))
            .await;
        Some(session)
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn chat_log(&self) -> &ChatLog {
        &self.chat_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestRoom, ADMIN_PASSWORD};

    async fn connect(room: &mut TestRoom, label: &str, id: &str) -> SessionInfo {
        let (outbound, rx) = Outbound::channel();
        let session = room
            .lifecycle
            .on_connect(ConnectionId::from(id), outbound, None)
            .await
            .expect("connect");
        room.track(label, session.id.clone(), rx);
        session
    }

    #[tokio::test]
    async fn test_solo_connect_gets_welcome_only() {
        let mut room = TestRoom::new();
        let session = connect(&mut room, "C", "socket-c0de").await;

        assert_eq!(session.display_name, "Guestc0de");
        assert_eq!(room.drain("C"), vec!["Welcome, Guestc0de!"]);
        assert_eq!(room.chat_log.lines(), vec!["Guestc0de connected."]);
    }

    #[tokio::test]
    async fn test_join_announced_to_others_only() {
        let mut room = TestRoom::new();
        connect(&mut room, "A", "socket-aaaa").await;
        room.drain("A");

        connect(&mut room, "B", "socket-bbbb").await;
        assert_eq!(room.drain("A"), vec!["Guestbbbb has joined the chat."]);
        assert_eq!(room.drain("B"), vec!["Welcome, Guestbbbb!"]);
    }

    #[tokio::test]
    async fn test_duplicate_connect_is_rejected() {
        let mut room = TestRoom::new();
        connect(&mut room, "A", "socket-aaaa").await;

        let (outbound, _rx) = Outbound::channel();
        let err = room
            .lifecycle
            .on_connect(ConnectionId::from("socket-aaaa"), outbound, None)
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateConnection("socket-aaaa".into()));
        assert_eq!(room.registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_connect_records_remote_address() {
        let mut room = TestRoom::new();
        let addr: SocketAddr = "203.0.113.7:51000".parse().unwrap();
        let (outbound, rx) = Outbound::channel();
        let session = room
            .lifecycle
            .on_connect(ConnectionId::from("socket-7777"), outbound, Some(addr))
            .await
            .unwrap();
        room.track("R", session.id.clone(), rx);

        let stored = room.registry.find_by_id(&session.id).await.unwrap();
        assert_eq!(stored.remote_addr, Some(addr));
        assert!(stored.connected_at <= std::time::SystemTime::now());
        assert_eq!(room.drain("R"), vec!["Welcome, Guest7777!"]);
    }

    #[tokio::test]
    async fn test_connect_past_limit_is_refused_silently() {
        let registry = Arc::new(SessionRegistry::with_limit(1));
        let lifecycle = LifecycleController::new(registry.clone(), ChatLog::memory(), ADMIN_PASSWORD);

        let (first, mut first_rx) = Outbound::channel();
        lifecycle
            .on_connect(ConnectionId::from("socket-0001"), first, None)
            .await
            .unwrap();
        let (second, _second_rx) = Outbound::channel();
        let err = lifecycle
            .on_connect(ConnectionId::from("socket-0002"), second, None)
            .await
            .unwrap_err();

        assert_eq!(err, RegistryError::Full(1));
        assert_eq!(registry.len().await, 1);
        // Only the welcome; no join announcement for the refused connection
        assert_eq!(
            first_rx.recv().await,
            Some(crate::connection::Outgoing::Text("Welcome, Guest0001!".into()))
        );
        assert!(first_rx.try_recv().is_err());
        assert_eq!(lifecycle.chat_log().lines(), vec!["Guest0001 connected."]);
    }

    #[tokio::test]
    async fn test_disconnect_announces_departure_to_remaining() {
        let mut room = TestRoom::new();
        let a = connect(&mut room, "A", "socket-aaaa").await;
        connect(&mut room, "B", "socket-bbbb").await;
        room.drain("A");
        room.drain("B");

        let removed = room.lifecycle.on_disconnect(&a.id).await;
        assert_eq!(removed.map(|s| s.display_name), Some("Guestaaaa".to_string()));
        assert_eq!(room.drain("B"), vec!["Guestaaaa has left the chat."]);
        assert!(room
            .chat_log
            .lines()
            .contains(&"Guestaaaa disconnected.".to_string()));
    }

    #[tokio::test]
    async fn test_disconnect_after_kick_is_silent() {
        let mut room = TestRoom::new();
        let a = connect(&mut room, "A", "socket-aaaa").await;
        let b = connect(&mut room, "B", "socket-bbbb").await;
        room.lifecycle.on_message(&a.id, "/username Alice").await;
        room.lifecycle.on_message(&b.id, "/username Bob").await;
        room.drain("A");
        room.drain("B");

        room.lifecycle
            .on_message(&a.id, &format!("/kick Bob {ADMIN_PASSWORD}"))
            .await;
        assert_eq!(room.drain("A"), vec!["Bob has been kicked from the chat."]);
        assert!(room.registry.find_by_id(&b.id).await.is_none());

        assert!(room.lifecycle.on_disconnect(&b.id).await.is_none());
        assert!(room.drain("A").is_empty());
        let departures = room
            .chat_log
            .lines()
            .into_iter()
            .filter(|line| line.contains("disconnected"))
            .count();
        assert_eq!(departures, 0);
    }

    #[tokio::test]
    async fn test_scenario_whisper_between_two_sessions() {
        let mut room = TestRoom::new();
        let a = connect(&mut room, "A", "socket-aaaa").await;
        let b = connect(&mut room, "B", "socket-bbbb").await;
        let c = connect(&mut room, "C", "socket-cccc").await;
        room.lifecycle.on_message(&a.id, "/username Alice").await;
        room.lifecycle.on_message(&b.id, "/username Bob").await;
        for label in ["A", "B", "C"] {
            room.drain(label);
        }

        room.lifecycle.on_message(&a.id, "/w Bob hello there").await;
        assert_eq!(room.drain("B"), vec!["Whisper from Alice: hello there"]);
        assert!(room.drain("A").is_empty());
        assert!(room.drain("C").is_empty());
        assert!(room.registry.find_by_id(&c.id).await.is_some());
    }
}
