//! Pending-payment queue operations.
//!
//! Rows are created the moment a write is attempted while offline and
//! normally removed by a successful drain pass. This module never talks to
//! the primary store: it is the fallback path, entered only after the caller
//! has already observed `ConnectionUnavailable`.

use chrono::{Month, Utc};
use uuid::Uuid;

use crate::error::{local_store_error, Result};
use crate::local::LocalCache;
use crate::model::{months_from_csv, months_to_csv, round_currency, PendingPayment};

/// Confirmation handed back for an offline save, good enough to print a
/// receipt from
#[derive(Debug, Clone)]
pub struct QueuedReceipt {
    /// Human-displayable synthetic reference ("OFFLINE-" + short id).
    /// Callers treat this as an opaque display string, exactly like a real
    /// transaction id.
    pub reference: String,
    /// The queued payment's idempotence token
    pub transaction_uuid: Uuid,
    /// The per-month split recorded for display
    pub amount_per_month: f64,
}

impl LocalCache {
    /// Queue a membership payment for later replay.
    ///
    /// The caller has already validated the month list and that the total
    /// divides evenly; the split is stored for display while the drain
    /// recomputes it at replay time.
    pub async fn enqueue_pending_payment(
        &self,
        member_id: i64,
        months: &[Month],
        year: i32,
        total_amount: f64,
    ) -> Result<QueuedReceipt> {
        let transaction_uuid = Uuid::new_v4();
        let amount_per_month = round_currency(total_amount / months.len() as f64);
        let reference = format!("OFFLINE-{}", &transaction_uuid.simple().to_string()[..8]);

        sqlx::query(
            "INSERT INTO pending_membership_payments
                 (member_id, year, months, total_amount, amount_per_month, created_at, transaction_uuid, synced)
             VALUES (?, ?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(member_id)
        .bind(year)
        .bind(months_to_csv(months))
        .bind(total_amount)
        .bind(amount_per_month)
        .bind(Utc::now().to_rfc3339())
        .bind(transaction_uuid.to_string())
        .execute(self.pool())
        .await
        .map_err(local_store_error)?;

        Ok(QueuedReceipt {
            reference,
            transaction_uuid,
            amount_per_month,
        })
    }

    /// All queued payments, oldest first (drain order).
    pub async fn pending_payments(&self) -> Result<Vec<PendingPayment>> {
        sqlx::query_as::<_, PendingPayment>(
            "SELECT local_id, member_id, year, months, total_amount, amount_per_month,
                    created_at, transaction_uuid, synced
             FROM pending_membership_payments
             ORDER BY local_id ASC",
        )
        .fetch_all(self.pool())
        .await
        .map_err(local_store_error)
    }

    /// Number of queued payments.
    pub async fn pending_count(&self) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM pending_membership_payments")
                .fetch_one(self.pool())
                .await
                .map_err(local_store_error)?;
        Ok(count)
    }

    /// Remove a queued payment after its replay committed.
    pub async fn delete_pending(&self, local_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM pending_membership_payments WHERE local_id = ?")
            .bind(local_id)
            .execute(self.pool())
            .await
            .map_err(local_store_error)?;
        Ok(())
    }

    /// Flag a queued payment as synced without deleting it.
    ///
    /// Audit workflows that keep replayed rows around use this instead of
    /// [`delete_pending`](Self::delete_pending); it is the only in-place
    /// mutation the queue supports.
    pub async fn mark_pending_synced(&self, local_id: i64) -> Result<()> {
        sqlx::query("UPDATE pending_membership_payments SET synced = 1 WHERE local_id = ?")
            .bind(local_id)
            .execute(self.pool())
            .await
            .map_err(local_store_error)?;
        Ok(())
    }

    /// Month numbers (1-12) named by queued payments for a member and year.
    ///
    /// Used by the offline duplicate-month check so an operator cannot
    /// record the same month twice during one outage.
    pub async fn pending_months(&self, member_id: i64, year: i32) -> Result<Vec<u32>> {
        let payments = sqlx::query_as::<_, PendingPayment>(
            "SELECT local_id, member_id, year, months, total_amount, amount_per_month,
                    created_at, transaction_uuid, synced
             FROM pending_membership_payments
             WHERE member_id = ? AND year = ?
             ORDER BY local_id ASC",
        )
        .bind(member_id)
        .bind(year)
        .fetch_all(self.pool())
        .await
        .map_err(local_store_error)?;

        let mut month_numbers = Vec::new();
        for payment in &payments {
            for month in months_from_csv(&payment.months)? {
                let number = month.number_from_month();
                if !month_numbers.contains(&number) {
                    month_numbers.push(number);
                }
            }
        }
        month_numbers.sort_unstable();
        Ok(month_numbers)
    }
}
