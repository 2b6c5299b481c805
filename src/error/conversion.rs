//! sqlx error classification.
//!
//! Telling "unreachable" apart from "the statement failed" is the most
//! load-bearing decision in the engine. A false positive routes legitimate
//! data into the pending queue and masks the underlying bug; a false
//! negative defeats the offline fallback entirely. Both the primary-store
//! session and the connection provider funnel every sqlx error through
//! [`classify_remote_error`] so the rule lives here and nowhere else.

use super::types::SyncError;

/// Classify a sqlx error raised while talking to the primary store.
///
/// Transport-level failures (socket I/O, TLS, pool lifecycle) become
/// [`SyncError::ConnectionUnavailable`]; malformed connect options become
/// [`SyncError::Configuration`]; everything else - constraint violations,
/// syntax errors, decode failures - is a [`SyncError::RemoteQuery`] that the
/// caller must surface rather than queue.
pub fn classify_remote_error(err: sqlx::Error) -> SyncError {
    match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => SyncError::ConnectionUnavailable(err.to_string()),
        sqlx::Error::Configuration(_) => SyncError::Configuration(err.to_string()),
        _ => SyncError::RemoteQuery(err.to_string()),
    }
}

/// Map a sqlx error raised by the embedded cache.
///
/// There is no classification to do on the local side: any failure of the
/// cache file is fatal for that operation.
pub fn local_store_error(err: sqlx::Error) -> SyncError {
    SyncError::LocalStore(err.to_string())
}
