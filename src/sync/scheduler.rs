//! Background auto-sync loop.
//!
//! The drain itself is a plain function; this wraps it in an interval loop
//! intended to be spawned onto the runtime once an operator has signed in:
//!
//! ```rust,no_run
//! # use std::time::Duration;
//! # use parish_ledger::{LocalCache, PgPrimary, OperatorSession};
//! # use parish_ledger::sync::{run_auto_sync, ConnectivityProbe, StatusReporter};
//! # async fn example(store: PgPrimary, cache: LocalCache, operator: OperatorSession) {
//! let handle = tokio::spawn(run_auto_sync(
//!     store,
//!     cache,
//!     ConnectivityProbe::default(),
//!     StatusReporter::new(),
//!     operator,
//!     Duration::from_secs(60),
//! ));
//! // ... abort the handle on shutdown
//! # }
//! ```

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::warn;

use crate::ledger::OperatorSession;
use crate::local::LocalCache;
use crate::remote::PrimaryStore;
use crate::sync::{drain_pending, ConnectivityProbe, StatusReporter};

/// Run the drain on a fixed interval until the task is aborted.
///
/// The first attempt runs immediately. Drain errors are logged and surfaced
/// through the status line; the loop itself never gives up.
pub async fn run_auto_sync<S: PrimaryStore>(
    store: S,
    cache: LocalCache,
    probe: ConnectivityProbe,
    status: StatusReporter,
    operator: OperatorSession,
    interval: Duration,
) {
    status.set("Auto-sync active. Monitoring...");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if let Err(err) = drain_pending(&store, &cache, &probe, &status, &operator).await {
            warn!(error = %err, "auto-sync pass failed");
            status.set(format!("Sync error: {err}"));
        }
    }
}
