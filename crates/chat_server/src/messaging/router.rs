//! Delivery primitives built on top of the session registry.
//!
//! Delivery is fire-and-forget: lines are queued on each recipient's
//! outbound handle with no acknowledgement and no retry. A recipient that
//! vanished between lookup and delivery simply does not receive the line.

use crate::connection::{ConnectionId, SessionInfo, SessionRegistry};
use std::sync::Arc;
use tracing::{debug, trace};

/// Broadcast and unicast delivery over the registry.
#[derive(Debug, Clone)]
pub struct Router {
    registry: Arc<SessionRegistry>,
}

impl Router {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Delivers `text` to every registered session.
    ///
    /// # Returns
    ///
    /// The number of sessions the line was queued for.
    pub async fn broadcast_all(&self, text: &str) -> usize {
        let count = self.registry.deliver_all(text, None).await;
        debug!("📡 Broadcasted message to {} sessions", count);
        count
    }

    /// Delivers `text` to every session except `exclude`.
    pub async fn broadcast_except(&self, text: &str, exclude: &ConnectionId) -> usize {
        let count = self.registry.deliver_all(text, Some(exclude)).await;
        debug!("📡 Broadcasted message to {} sessions (excluding {})", count, exclude);
        count
    }

    /// Delivers `text` to one session by connection id.
    ///
    /// Returns `false` when the session is gone; callers may ignore it.
    pub async fn unicast(&self, connection_id: &ConnectionId, text: &str) -> bool {
        let delivered = self.registry.deliver_to(connection_id, text).await;
        if !delivered {
            trace!("Dropped unicast to departed connection {}", connection_id);
        }
        delivered
    }

    /// Delivers `text` to the session currently named `name`.
    ///
    /// Lookup and delivery happen in one critical section, so a concurrent
    /// rename resolves to whoever holds the name at that moment.
    pub async fn unicast_by_name(&self, name: &str, text: &str) -> Option<SessionInfo> {
        self.registry.deliver_to_name(name, text).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::TestRoom;

    #[tokio::test]
    async fn test_broadcast_all_reaches_everyone() {
        let mut room = TestRoom::with_names(&["Alice", "Bob", "Carol"]).await;
        let count = room.router.broadcast_all("hello all").await;
        assert_eq!(count, 3);
        for name in ["Alice", "Bob", "Carol"] {
            assert_eq!(room.drain(name), vec!["hello all"]);
        }
    }

    #[tokio::test]
    async fn test_broadcast_except_skips_sender() {
        let mut room = TestRoom::with_names(&["Alice", "Bob", "Carol"]).await;
        let alice = room.id("Alice");
        let count = room.router.broadcast_except("Alice: hi", &alice).await;
        assert_eq!(count, 2);
        assert!(room.drain("Alice").is_empty());
        assert_eq!(room.drain("Bob"), vec!["Alice: hi"]);
        assert_eq!(room.drain("Carol"), vec!["Alice: hi"]);
    }

    #[tokio::test]
    async fn test_unicast_to_removed_session_is_dropped() {
        let mut room = TestRoom::with_names(&["Alice", "Bob"]).await;
        let bob = room.id("Bob");
        room.registry.unregister(&bob).await;

        assert!(!room.router.unicast(&bob, "are you there?").await);
        assert!(room.drain("Alice").is_empty());
    }

    #[tokio::test]
    async fn test_unicast_by_name() {
        let mut room = TestRoom::with_names(&["Alice", "Bob"]).await;
        let recipient = room.router.unicast_by_name("Bob", "psst").await;
        assert_eq!(recipient.map(|s| s.display_name), Some("Bob".to_string()));
        assert_eq!(room.drain("Bob"), vec!["psst"]);
        assert!(room.drain("Alice").is_empty());
        assert!(room.router.unicast_by_name("Nobody", "psst").await.is_none());
    }
}
