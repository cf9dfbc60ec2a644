//! Connection management for chat sessions.
//!
//! This module handles the lifecycle of client sessions, including the
//! outbound delivery handle, the session record and the shared registry.

pub mod client;
pub mod outbound;
pub mod registry;

pub use client::{Session, SessionInfo};
pub use outbound::{Outbound, Outgoing};
pub use registry::SessionRegistry;

use std::fmt;

/// Opaque connection identifier.
///
/// Assigned once by the transport when a connection is accepted and never
/// reused; it is the primary key of the [`SessionRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last `len` characters of the identifier (the whole id if shorter).
    pub fn suffix(&self, len: usize) -> &str {
        if len == 0 {
            return "";
        }
        let start = self
            .0
            .char_indices()
            .rev()
            .nth(len - 1)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        &self.0[start..]
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ConnectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ConnectionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix() {
        let id = ConnectionId::from("abcdef123456");
        assert_eq!(id.suffix(4), "3456");
        assert_eq!(id.suffix(12), "abcdef123456");
        assert_eq!(id.suffix(40), "abcdef123456");
        assert_eq!(ConnectionId::from("ab").suffix(4), "ab");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }
}
