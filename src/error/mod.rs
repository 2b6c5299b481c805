//! # Error Types
//!
//! Unified error taxonomy for the sync engine.
//!
//! Every fallback decision in the crate is gated on the distinction between
//! [`SyncError::ConnectionUnavailable`] (the primary store could not be
//! reached) and every other kind of failure. That classification happens in
//! exactly one place, [`classify_remote_error`], so that a query bug can
//! never be mistaken for an outage and silently routed into the offline
//! queue.

mod conversion;
mod types;

pub use conversion::{classify_remote_error, local_store_error};
pub use types::{Result, SyncError};
