//! Session registry for tracking connected participants.
//!
//! This module provides the central store mapping connection ids to sessions.
//! It enforces display-name uniqueness and performs every check-then-act
//! sequence under a single lock acquisition, so concurrent connects,
//! disconnects, renames and kicks always observe a consistent map.

use super::{ConnectionId, Outbound, Session, SessionInfo};
use crate::error::RegistryError;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Suffix lengths tried, in order, when deriving a default display name.
const DEFAULT_NAME_SUFFIXES: [usize; 4] = [4, 6, 8, 12];

/// Central registry of all connected sessions.
///
/// # Architecture
///
/// * Uses `RwLock<HashMap>` for thread-safe session storage
/// * Name lookups are linear scans, which is fine at chat-room scale
/// * Delivery happens while the lock is held; it only queues on unbounded
///   channels, so no await point sits inside a critical section
#[derive(Debug)]
pub struct SessionRegistry {
    /// Map of connection id to session
    sessions: Arc<RwLock<HashMap<ConnectionId, Session>>>,

    /// Registration is refused once this many sessions exist
    max_sessions: usize,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_limit(usize::MAX)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that holds at most `max_sessions` sessions.
    pub fn with_limit(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions,
        }
    }

    /// Registers a new session under a generated `Guest<suffix>` name.
    ///
    /// # Errors
    ///
    /// * `RegistryError::DuplicateConnection` if the id is already present.
    ///   The transport guarantees unique ids, so this signals a bug upstream.
    /// * `RegistryError::Full` if the session limit is reached. The check and
    ///   the insert share one write lock, so the limit is never overshot.
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        outbound: Outbound,
        remote_addr: Option<SocketAddr>,
    ) -> Result<SessionInfo, RegistryError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&connection_id) {
            return Err(RegistryError::DuplicateConnection(connection_id.to_string()));
        }
        if sessions.len() >= self.max_sessions {
            return Err(RegistryError::Full(self.max_sessions));
        }

        let display_name = default_name(&connection_id, &sessions);
        let session = Session::new(connection_id.clone(), display_name, outbound, remote_addr);
        let info = session.info();
        sessions.insert(connection_id, session);
        debug!("🔗 Registered {} as {}", info.id, info.display_name);
        Ok(info)
    }

    /// Removes a session, dropping its outbound handle.
    ///
    /// Returns `None` when the id is not registered, e.g. when the natural
    /// disconnect of a kicked connection arrives after the kick removed it.
    pub async fn unregister(&self, connection_id: &ConnectionId) -> Option<SessionInfo> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.remove(connection_id)?;
        debug!("❌ Unregistered {} ({})", session.id, session.display_name);
        Some(session.info())
    }

    pub async fn find_by_id(&self, connection_id: &ConnectionId) -> Option<SessionInfo> {
        let sessions = self.sessions.read().await;
        sessions.get(connection_id).map(Session::info)
    }

    pub async fn find_by_name(&self, name: &str) -> Option<SessionInfo> {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .find(|session| session.display_name == name)
            .map(Session::info)
    }

    /// Changes a session's display name and returns the previous one.
    ///
    /// The uniqueness check and the update happen under one write lock.
    pub async fn rename(
        &self,
        connection_id: &ConnectionId,
        new_name: &str,
    ) -> Result<String, RegistryError> {
        let mut sessions = self.sessions.write().await;

        let current = sessions
            .get(connection_id)
            .map(|session| session.display_name.as_str())
            .ok_or_else(|| RegistryError::NotFound(connection_id.to_string()))?;
        if current == new_name {
            return Err(RegistryError::SameName);
        }
        if sessions.values().any(|session| session.display_name == new_name) {
            return Err(RegistryError::NameConflict(new_name.to_string()));
        }

        let session = sessions
            .get_mut(connection_id)
            .ok_or_else(|| RegistryError::NotFound(connection_id.to_string()))?;
        let old_name = std::mem::replace(&mut session.display_name, new_name.to_string());
        info!("✏️ {} renamed {} -> {}", connection_id, old_name, new_name);
        Ok(old_name)
    }

    /// Notifies and closes the session named `name`, then removes it.
    ///
    /// The lookup, the notice, the close request and the removal form one
    /// critical section, so the target cannot rename or disconnect halfway
    /// and no later broadcast can reach it.
    pub async fn evict_by_name(&self, name: &str, notice: &str) -> Option<SessionInfo> {
        let mut sessions = self.sessions.write().await;
        let connection_id = sessions
            .values()
            .find(|session| session.display_name == name)
            .map(|session| session.id.clone())?;

        let session = sessions.remove(&connection_id)?;
        session.outbound.send(notice);
        session.outbound.close(notice);
        info!("👢 Evicted {} ({})", session.id, session.display_name);
        Some(session.info())
    }

    /// Current display names, in map iteration order.
    pub async fn display_names(&self) -> Vec<String> {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .map(|session| session.display_name.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Delivers `text` to one session. Returns `false` if it is not registered.
    pub(crate) async fn deliver_to(&self, connection_id: &ConnectionId, text: &str) -> bool {
        let sessions = self.sessions.read().await;
        match sessions.get(connection_id) {
            Some(session) => session.outbound.send(text),
            None => false,
        }
    }

    /// Looks up a session by display name and delivers `text` to it in the
    /// same critical section. Returns the recipient, if any.
    pub(crate) async fn deliver_to_name(&self, name: &str, text: &str) -> Option<SessionInfo> {
        let sessions = self.sessions.read().await;
        let session = sessions.values().find(|session| session.display_name == name)?;
        session.outbound.send(text);
        Some(session.info())
    }

    /// Delivers `text` to every session except `exclude`. Returns the number
    /// of sessions the line was queued for.
    pub(crate) async fn deliver_all(&self, text: &str, exclude: Option<&ConnectionId>) -> usize {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|session| Some(&session.id) != exclude)
            .filter(|session| session.outbound.send(text))
            .count()
    }
}

/// Derives a `Guest<suffix>` name that no current session uses.
fn default_name(connection_id: &ConnectionId, sessions: &HashMap<ConnectionId, Session>) -> String {
    let taken = |candidate: &str| sessions.values().any(|s| s.display_name == candidate);

    for len in DEFAULT_NAME_SUFFIXES {
        let candidate = format!("Guest{}", connection_id.suffix(len));
        if !taken(&candidate) {
            return candidate;
        }
    }

    let base = format!("Guest{}", connection_id.suffix(DEFAULT_NAME_SUFFIXES[0]));
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}
