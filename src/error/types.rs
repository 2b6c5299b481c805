//! Error enum and result alias used across the crate.

use thiserror::Error;

/// Errors produced by the sync engine
///
/// The variants mirror the fallback chain: configuration problems are fatal
/// and surfaced immediately, an unreachable primary store triggers the
/// offline fallback, a reachable-but-failing statement is a genuine error
/// that must never be queued, and a local cache failure is the bottom of the
/// chain with nowhere further to fall back to.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Primary-store credentials or settings missing or malformed
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network-level failure reaching the primary store
    ///
    /// This is the only error kind that write paths convert into a queue
    /// enqueue and read paths convert into a mirror lookup.
    #[error("primary store unreachable: {0}")]
    ConnectionUnavailable(String),

    /// The primary store was reached but the statement failed
    #[error("remote query failed: {0}")]
    RemoteQuery(String),

    /// The embedded cache file is unreadable or unwritable
    #[error("local cache error: {0}")]
    LocalStore(String),

    /// A payment payload could not be interpreted (e.g. a month name in a
    /// queued row that no longer parses)
    #[error("invalid payment data: {0}")]
    InvalidData(String),
}

impl SyncError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an unreachable-primary error
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::ConnectionUnavailable(message.into())
    }

    /// Create a remote query error
    pub fn remote(message: impl Into<String>) -> Self {
        Self::RemoteQuery(message.into())
    }

    /// Create a local cache error
    pub fn local(message: impl Into<String>) -> Self {
        Self::LocalStore(message.into())
    }

    /// Create an invalid-data error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    /// Whether this error should trigger the offline fallback
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::ConnectionUnavailable(_))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, SyncError>;
