//! Non-membership ledger writes.
//!
//! Tithes, donations, parking fees, thanksgiving offerings, expenses and
//! bag offerings are single-row inserts with no offline queue: if the
//! primary store is unreachable the error surfaces to the caller, and a
//! statement failure is a statement failure, never converted into offline
//! mode.

use crate::error::Result;
use crate::ledger::OperatorSession;
use crate::model::TransactionKind;
use crate::remote::{PrimarySession, PrimaryStore};
use crate::sync::StatusReporter;

/// Record a single ledger transaction online.
///
/// `member_id` is `None` for anonymous givers (bag offerings, walk-in
/// donations). Expenses are stored negative regardless of the sign the
/// caller passes. Returns the new transaction id as an opaque display
/// string.
pub async fn record_transaction<S: PrimaryStore>(
    store: &S,
    status: &StatusReporter,
    operator: &OperatorSession,
    kind: TransactionKind,
    member_id: Option<i64>,
    amount: f64,
) -> Result<String> {
    let mut session = store.connect().await?;
    let transaction_id = session
        .record_transaction(operator.user_id, kind, member_id, amount)
        .await?;

    status.set(format!("Recorded {} transaction.", kind.as_str()));
    Ok(transaction_id.to_string())
}
