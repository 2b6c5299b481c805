//! # Domain Model
//!
//! Row types shared between the primary store and the local cache, plus the
//! payment-group expansion that turns one logical membership payment into
//! its per-month ledger inserts.
//!
//! ## Key Components
//!
//! - `records.rs` - reference-data rows (users, members, paid periods) and
//!   the pending-queue row
//! - `payment.rs` - transaction kinds, month-name round-trips, currency
//!   rounding, and [`PaymentGroup`] expansion with deterministic ids

mod payment;
mod records;

pub use payment::{
    months_from_csv, months_to_csv, round_currency, PaymentEntry, PaymentGroup, TransactionKind,
};
pub use records::{MemberRecord, PaidPeriod, PendingPayment, RemoteUser};
