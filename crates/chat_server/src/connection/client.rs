//! Session representation.
//!
//! A [`Session`] is one registered participant. It owns the outbound handle
//! and is only ever reachable through the registry; callers outside the
//! registry work with [`SessionInfo`] snapshots.

use super::{ConnectionId, Outbound};
use std::net::SocketAddr;
use std::time::SystemTime;

/// One connected participant.
#[derive(Debug)]
pub struct Session {
    /// Immutable primary key
    pub id: ConnectionId,

    /// Current display name, unique across the registry
    pub display_name: String,

    /// Delivery handle, dropped together with the registry entry
    pub outbound: Outbound,

    /// Remote network address, when the transport knows it
    pub remote_addr: Option<SocketAddr>,

    /// When the session was registered
    pub connected_at: SystemTime,
}

impl Session {
    pub fn new(
        id: ConnectionId,
        display_name: String,
        outbound: Outbound,
        remote_addr: Option<SocketAddr>,
    ) -> Self {
        Self {
            id,
            display_name,
            outbound,
            remote_addr,
            connected_at: SystemTime::now(),
        }
    }

    /// Snapshot of the identity fields, without the outbound handle.
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            remote_addr: self.remote_addr,
            connected_at: self.connected_at,
        }
    }
}

/// Detached copy of a session's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: ConnectionId,
    pub display_name: String,
    pub remote_addr: Option<SocketAddr>,
    pub connected_at: SystemTime,
}
