//! Membership payment recording and paid-month lookup.
//!
//! The one write path with an offline fallback: a payment that cannot reach
//! the primary store is queued locally and the caller still gets a reference
//! string it can print on a receipt.

use chrono::Month;
use uuid::Uuid;

use crate::error::Result;
use crate::ledger::{with_offline_fallback, OperatorSession};
use crate::local::LocalCache;
use crate::model::PaymentGroup;
use crate::remote::{PrimarySession, PrimaryStore};
use crate::sync::StatusReporter;

/// What the caller shows on the receipt
///
/// `reference` is opaque: a remote group id when the write landed online, a
/// synthetic "OFFLINE-" id when it was queued. Callers must not treat it as
/// a database row id.
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    pub reference: String,
    pub amount_per_month: f64,
    /// True when the payment went into the pending queue instead of the
    /// primary store
    pub offline: bool,
}

/// Record a membership payment covering one or more months.
///
/// Online: one remote transaction inserts the whole expanded group. On
/// `ConnectionUnavailable` (and only then): the payment is queued locally
/// and a synthetic reference is returned so the receipt can still print.
/// The caller has already validated that `months` is sensible and the total
/// divides evenly across it.
pub async fn record_membership_payment<S: PrimaryStore>(
    store: &S,
    cache: &LocalCache,
    status: &StatusReporter,
    operator: &OperatorSession,
    member_id: i64,
    months: &[Month],
    year: i32,
    total_amount: f64,
) -> Result<PaymentConfirmation> {
    let group = PaymentGroup::expand(Uuid::new_v4(), member_id, year, months, total_amount)?;
    let amount_per_month = group.entries[0].amount;

    with_offline_fallback(
        status,
        async {
            let mut session = store.connect().await?;
            session
                .record_payment_group(operator.user_id, &group)
                .await?;
            status.set(format!(
                "Recorded membership payment for {} month(s).",
                group.entries.len()
            ));
            Ok(PaymentConfirmation {
                reference: group.group_id.to_string(),
                amount_per_month,
                offline: false,
            })
        },
        || async {
            let receipt = cache
                .enqueue_pending_payment(member_id, months, year, total_amount)
                .await?;
            status.set(format!(
                "Offline: saved {} month(s) locally. Awaiting sync.",
                months.len()
            ));
            Ok(PaymentConfirmation {
                reference: receipt.reference,
                amount_per_month: receipt.amount_per_month,
                offline: true,
            })
        },
    )
    .await
}

/// Month numbers (1-12) already paid by a member in a year.
///
/// Online this asks the primary store. Offline it unions the mirror history
/// with months named by queued payments, so an operator cannot record the
/// same month twice during one outage. An empty result is a valid answer,
/// not an error.
pub async fn paid_months_for_year<S: PrimaryStore>(
    store: &S,
    cache: &LocalCache,
    status: &StatusReporter,
    member_id: i64,
    year: i32,
) -> Result<Vec<u32>> {
    with_offline_fallback(
        status,
        async {
            let mut session = store.connect().await?;
            session.paid_months(member_id, year).await
        },
        || async {
            let mut months = cache.paid_months(member_id, year).await?;
            for month in cache.pending_months(member_id, year).await? {
                if !months.contains(&month) {
                    months.push(month);
                }
            }
            months.sort_unstable();
            Ok(months)
        },
    )
    .await
}
