//! Error types and handling for the chat server.
//!
//! Infrastructure failures ([`ServerError`]) are kept apart from the
//! user-facing command failures ([`CommandError`]), which never leave the
//! dispatcher: each one becomes a single reply line to the offending sender.

/// Enumeration of possible server errors.
///
/// Categorizes errors into network-related and internal server errors
/// to help with debugging and error handling.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Network-related errors such as binding failures or connection issues
    #[error("Network error: {0}")]
    Network(String),

    /// Internal consistency failures such as a duplicate connection id
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures reported by the session registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The transport handed out a connection id that is already registered
    #[error("connection {0} is already registered")]
    DuplicateConnection(String),

    /// No session is registered under the connection id
    #[error("connection {0} is not registered")]
    NotFound(String),

    /// Another session already uses the requested display name
    #[error("display name {0:?} is already in use")]
    NameConflict(String),

    /// The requested display name equals the current one
    #[error("display name is unchanged")]
    SameName,

    /// The session limit is reached
    #[error("registry is full ({0} sessions)")]
    Full(usize),
}

/// User-facing command failures.
///
/// The `Display` output is the exact reply line sent back to the sender.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Wrong number of arguments; carries the usage string
    #[error("Error: Invalid command format. Use {0}.")]
    Format(&'static str),

    /// Named target is not connected
    #[error("Error: User \"{0}\" not found.")]
    NotFound(String),

    /// Requested display name is taken
    #[error("Error: Username \"{0}\" is already in use.")]
    Conflict(String),

    /// Wrong admin secret
    #[error("Error: Incorrect admin password.")]
    Auth,

    /// Whisper or kick aimed at the sender; carries the verb phrase
    #[error("Error: You cannot {0} yourself.")]
    SelfTarget(&'static str),

    /// Rename to the current name
    #[error("Error: New username cannot be the same as the old username.")]
    SameValue,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}
