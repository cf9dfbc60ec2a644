//! # Chat Server - Session Registry and Message Routing
//!
//! The core of the chat hub: it maps live WebSocket connections to display
//! identities, enforces the identity and command rules, and routes chat lines
//! between participants while connections come and go concurrently.
//!
//! ## Architecture Overview
//!
//! ### Core Components
//!
//! * **Session Registry** - Connection id to session mapping with unique display names
//! * **Router** - Broadcast and unicast delivery built on the registry
//! * **Dispatcher** - Parses `/` commands and executes them, forwards plain chat
//! * **Lifecycle Controller** - Registers, announces and retires sessions
//! * **Chat Log** - Append-only, fire-and-forget trace of chat events
//!
//! ### Message Flow
//!
//! 1. A client completes the WebSocket handshake and is registered as `Guest<xxxx>`
//! 2. Every inbound text frame is handed to the dispatcher
//! 3. Commands mutate or query the registry inside a single critical section
//! 4. Replies and announcements are queued on each session's outbound handle
//! 5. The per-connection outgoing task writes them to the socket
//!
//! ## Commands
//!
//! | Command | Effect |
//! |---|---|
//! | `/w <user> <message>` | Private message to one user |
//! | `/username <new>` | Change your display name |
//! | `/kick <user> <password>` | Remove a user (admin password required) |
//! | `/clientlist` | List connected users |
//! | `/commands` | Show the command help |
//!
//! ## Thread Safety
//!
//! The registry is an `Arc<RwLock<HashMap>>`; every check-then-act sequence
//! (register, unregister, rename, whisper lookup and delivery, kick eviction)
//! runs under one lock acquisition. Outbound delivery goes through unbounded
//! channels, so nothing blocks while the lock is held.

pub use chat_log::ChatLog;
pub use config::ServerConfig;
pub use connection::{ConnectionId, Outbound, Outgoing, SessionInfo, SessionRegistry};
pub use error::{CommandError, RegistryError, ServerError};
pub use lifecycle::LifecycleController;
pub use messaging::{Command, Dispatcher, Router};
pub use server::ChatServer;
pub use utils::{create_server, create_server_with_config};

pub mod chat_log;
pub mod config;
pub mod connection;
pub mod error;
pub mod lifecycle;
pub mod messaging;
pub mod server;
pub mod shutdown;
pub mod utils;


#[cfg(test)]
mod test_support;
