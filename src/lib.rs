//! Parish Ledger - Offline-First Sync Engine
//!
//! The synchronization core of a church office ledger application: a
//! networked PostgreSQL database is the source of truth, and when it cannot
//! be reached the engine falls back to an embedded SQLite cache, queues the
//! write, and later reconciles it back without duplication.
//!
//! # Overview
//!
//! On every write the caller first tries the primary store. On a classified
//! "unreachable" failure (and only that failure) the same logical write goes
//! into a durable local queue and the caller receives a synthetic reference
//! it can still print on a receipt. A background drain periodically probes
//! the network and, when it looks up, replays the queue one payment group at
//! a time, deleting each row only after its remote inserts committed. Remote
//! transaction ids are derived deterministically from each queued payment's
//! id, so an interrupted pass replays as a no-op instead of a duplicate.
//!
//! # Module Structure
//!
//! - **`config`** - environment-driven settings (database URL, cache path,
//!   probe endpoint)
//! - **`error`** - the error taxonomy and the single point classifying
//!   "unreachable" apart from every other failure
//! - **`model`** - domain rows and the per-month payment expansion
//! - **`remote`** - primary-store connection provider and session operations
//! - **`local`** - the embedded cache: offline mirrors and the pending queue
//! - **`sync`** - probe, status line, mirror refresh, queue drain, auto-sync
//! - **`ledger`** - the entry points the form windows call
//!
//! # Usage
//!
//! ```rust,no_run
//! use parish_ledger::{authenticate, record_membership_payment};
//! use parish_ledger::{config, LocalCache, PgPrimary, StatusReporter};
//!
//! # async fn example() -> parish_ledger::Result<()> {
//! let store = PgPrimary::from_env()?;
//! let cache = LocalCache::open(&config::local_cache_path()).await?;
//! let status = StatusReporter::new();
//!
//! let operator = authenticate(&store, &cache, &status, "clerk", "secret")
//!     .await?
//!     .expect("bad credentials");
//!
//! let confirmation = record_membership_payment(
//!     &store,
//!     &cache,
//!     &status,
//!     &operator,
//!     42,
//!     &[chrono::Month::March],
//!     2025,
//!     500.0,
//! )
//! .await?;
//!
//! // Online or queued, there is always a reference to print
//! println!("receipt ref: {}", confirmation.reference);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod local;
pub mod model;
pub mod remote;
pub mod sync;

pub use error::{Result, SyncError};
pub use ledger::{
    authenticate, paid_months_for_year, record_membership_payment, record_transaction,
    OperatorSession, PaymentConfirmation,
};
pub use local::LocalCache;
pub use model::TransactionKind;
pub use remote::{PgPrimary, PrimarySession, PrimaryStore};
pub use sync::{
    drain_pending, refresh_mirrors, ConnectivityProbe, DrainReport, MirrorOutcome, StatusReporter,
};
