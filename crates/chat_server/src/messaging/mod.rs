//! Message handling and routing for chat traffic.
//!
//! This module provides command parsing, the dispatcher that executes
//! commands and plain chat, and the router that delivers the results.

pub mod command;
pub mod dispatcher;
pub mod router;

pub use command::Command;
pub use dispatcher::Dispatcher;
pub use router::Router;
