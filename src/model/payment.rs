//! Transaction kinds and payment-group expansion.
//!
//! A payment covering N months becomes N ledger inserts. The expansion is
//! the single place that derives remote transaction ids: UUIDv5 in the
//! namespace of the payment's group id, keyed by month position, so that
//! replaying the same queued payment always produces the same ids and a
//! repeated replay is a no-op on the remote side.

use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Result, SyncError};

/// Ledger transaction type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Membership,
    Tithe,
    Donation,
    Parking,
    Thanksgiving,
    Expense,
    BagOffering,
}

impl TransactionKind {
    /// Tag stored in the `transaction_type` column
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Membership => "membership",
            Self::Tithe => "tithe",
            Self::Donation => "donation",
            Self::Parking => "parking",
            Self::Thanksgiving => "thanksgiving",
            Self::Expense => "expense",
            Self::BagOffering => "bag_offering",
        }
    }

    /// Apply the ledger sign convention: expenses are negative, everything
    /// else is positive
    pub fn signed_amount(self, amount: f64) -> f64 {
        match self {
            Self::Expense => -amount.abs(),
            _ => amount.abs(),
        }
    }
}

/// Round a currency value to two decimal places
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse a comma-separated month-name list ("January,February") back into
/// months, in order
pub fn months_from_csv(csv: &str) -> Result<Vec<Month>> {
    csv.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            Month::from_str(name)
                .map_err(|_| SyncError::invalid(format!("unrecognized month name: {name:?}")))
        })
        .collect()
}

/// Serialize months as the comma-separated name list used by the queue
pub fn months_to_csv(months: &[Month]) -> String {
    months
        .iter()
        .map(|month| month.name())
        .collect::<Vec<_>>()
        .join(",")
}

/// One per-month insert pair within a payment group
#[derive(Debug, Clone)]
pub struct PaymentEntry {
    /// Remote transaction id, derived deterministically from the group id
    pub transaction_id: Uuid,
    pub month: Month,
    /// First-of-month date stored in the membership detail row
    pub payment_date: NaiveDate,
    /// The per-month share of the payment, already rounded
    pub amount: f64,
}

/// A logical membership payment expanded into its per-month inserts
#[derive(Debug, Clone)]
pub struct PaymentGroup {
    /// Group id; the idempotence token for the whole payment
    pub group_id: Uuid,
    pub member_id: i64,
    pub year: i32,
    pub entries: Vec<PaymentEntry>,
}

impl PaymentGroup {
    /// Expand a payment into per-month entries.
    ///
    /// The per-month amount is recomputed here as
    /// `round(total_amount / months.len(), 2)` rather than read back from
    /// any stored split, so replayed values match what the online write path
    /// would have produced. Callers have already validated that the total
    /// divides sensibly; an empty month list is still rejected.
    pub fn expand(
        group_id: Uuid,
        member_id: i64,
        year: i32,
        months: &[Month],
        total_amount: f64,
    ) -> Result<Self> {
        if months.is_empty() {
            return Err(SyncError::invalid("payment covers no months"));
        }

        let per_month = round_currency(total_amount / months.len() as f64);

        let entries = months
            .iter()
            .enumerate()
            .map(|(index, &month)| {
                let payment_date =
                    NaiveDate::from_ymd_opt(year, month.number_from_month(), 1).ok_or_else(
                        || SyncError::invalid(format!("invalid payment period {year}-{month:?}")),
                    )?;
                Ok(PaymentEntry {
                    transaction_id: Uuid::new_v5(&group_id, format!("month-{index}").as_bytes()),
                    month,
                    payment_date,
                    amount: per_month,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            group_id,
            member_id,
            year,
            entries,
        })
    }
}
