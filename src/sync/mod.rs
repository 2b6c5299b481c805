//! # Synchronization Engine
//!
//! Everything that moves data across the online/offline boundary.
//!
//! ## Key Components
//!
//! - `probe.rs` - advisory TCP reachability check, independent of the
//!   primary store's credentials and schema
//! - `status.rs` - the single current status line a UI timer polls
//! - `mirror.rs` - pull-and-replace refresh of the offline read mirrors
//! - `drain.rs` - replay of queued offline payments, one payment group at a
//!   time, idempotent across retries
//! - `scheduler.rs` - interval-driven background drain loop
//!
//! The drain runs off the interactive thread (background task or manual
//! trigger); the probe and the initial connect are the only operations with
//! timeouts, both short, so nothing here can stall the UI.

mod drain;
mod mirror;
mod probe;
mod scheduler;
mod status;

pub use drain::{drain_pending, DrainReport};
pub use mirror::{refresh_mirrors, MirrorOutcome};
pub use probe::ConnectivityProbe;
pub use scheduler::run_auto_sync;
pub use status::StatusReporter;
