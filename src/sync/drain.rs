//! Queue drain.
//!
//! Replays every queued offline payment against the primary store, one
//! payment group at a time, deleting each queue row only after its remote
//! inserts committed. Replay is idempotent: the remote transaction ids are
//! derived from the queued `transaction_uuid`, so a pass interrupted between
//! remote commit and local delete re-inserts nothing on the next attempt.

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Result, SyncError};
use crate::ledger::OperatorSession;
use crate::local::LocalCache;
use crate::model::{months_from_csv, PaymentGroup, PendingPayment};
use crate::remote::{PrimarySession, PrimaryStore};
use crate::sync::{ConnectivityProbe, StatusReporter};

/// Result of one drain pass
#[derive(Debug, Clone)]
pub struct DrainReport {
    /// Queue rows replayed and removed
    pub synced: u32,
    /// Queue rows left in place for the next pass
    pub failed: u32,
    /// Final human-readable summary, also published via the status reporter
    pub message: String,
}

impl DrainReport {
    fn postponed(message: impl Into<String>) -> Self {
        Self {
            synced: 0,
            failed: 0,
            message: message.into(),
        }
    }
}

/// Replay queued payments against the primary store.
///
/// A pass is never retried mid-flight; whatever fails stays queued and the
/// caller (manual button or background timer) re-invokes later. One remote
/// session serves the whole pass.
pub async fn drain_pending<S: PrimaryStore>(
    store: &S,
    cache: &LocalCache,
    probe: &ConnectivityProbe,
    status: &StatusReporter,
    operator: &OperatorSession,
) -> Result<DrainReport> {
    status.set("Checking connectivity...");
    if !probe.is_network_reachable().await {
        status.set("Offline — sync postponed.");
        return Ok(DrainReport::postponed("Offline — sync postponed."));
    }

    let pending = cache.pending_payments().await?;
    if pending.is_empty() {
        status.set("No pending offline records.");
        return Ok(DrainReport::postponed("No pending offline records."));
    }

    status.set("Connecting to primary store...");
    let mut session = match store.connect().await {
        Ok(session) => session,
        Err(SyncError::ConnectionUnavailable(reason)) => {
            warn!(%reason, "drain postponed, primary store unreachable");
            status.set("Primary store unreachable — sync postponed.");
            return Ok(DrainReport::postponed(
                "Primary store unreachable — sync postponed.",
            ));
        }
        Err(other) => return Err(other),
    };

    status.set(format!("Uploading {} pending payment(s)...", pending.len()));

    let mut synced = 0u32;
    let mut failed = 0u32;

    for payment in &pending {
        match replay_one(&mut session, operator, payment).await {
            Ok(()) => {
                // The remote commit has landed; only now is the local row
                // removed. A crash between the two re-replays harmlessly.
                cache.delete_pending(payment.local_id).await?;
                synced += 1;
            }
            Err(err) if err.is_offline() => {
                warn!(local_id = payment.local_id, error = %err, "connection lost mid-drain");
                failed += 1;
                // No point attempting the remaining items on a dead link;
                // they stay queued for the next pass.
                break;
            }
            Err(err) => {
                warn!(local_id = payment.local_id, error = %err, "replay failed, row kept");
                failed += 1;
            }
        }
    }

    let message = format!("Sync complete: {synced} uploaded, {failed} failed.");
    info!(synced, failed, "drain pass finished");
    status.set(message.clone());

    Ok(DrainReport {
        synced,
        failed,
        message,
    })
}

/// Expand one queue row and insert it remotely.
///
/// The per-month amount is recomputed from `total_amount` during expansion;
/// the stored split is display-only. The group id is the queued
/// `transaction_uuid`, which pins the derived remote ids across retries.
async fn replay_one<C: PrimarySession>(
    session: &mut C,
    operator: &OperatorSession,
    payment: &PendingPayment,
) -> Result<()> {
    let group_id = Uuid::parse_str(&payment.transaction_uuid).map_err(|_| {
        SyncError::invalid(format!(
            "queued payment {} has a malformed transaction uuid",
            payment.local_id
        ))
    })?;
    let months = months_from_csv(&payment.months)?;
    let group = PaymentGroup::expand(
        group_id,
        payment.member_id,
        payment.year,
        &months,
        payment.total_amount,
    )?;

    session
        .record_payment_group(operator.user_id, &group)
        .await?;
    Ok(())
}
