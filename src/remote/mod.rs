//! # Primary Store
//!
//! Connection provider and session operations for the authoritative
//! relational database.
//!
//! ## Key Components
//!
//! - [`PrimaryStore`] / [`PrimarySession`] - the seam the sync engine talks
//!   through; the drain and mirror refresh are generic over it so they can
//!   be exercised against an in-memory double
//! - `connection.rs` - [`PgPrimary`], the PostgreSQL provider with the short
//!   fixed connect timeout and the unreachable-vs-query-bug classification
//! - `ledger.rs` - [`PgSession`], the concrete session: payment-group
//!   inserts, sibling transaction inserts, paid-month queries, mirror pulls
//!
//! One session maps to one logical operation (an interactive write, a whole
//! drain pass); there is no pooling contract.

mod connection;
mod ledger;

pub use connection::PgPrimary;
pub use ledger::PgSession;

use crate::error::Result;
use crate::model::{MemberRecord, PaidPeriod, PaymentGroup, RemoteUser, TransactionKind};
use uuid::Uuid;

/// Produces sessions against the primary store.
///
/// `connect` fails with `ConnectionUnavailable` when the store cannot be
/// reached (including a connect timeout) and with `Configuration` when the
/// connection settings themselves are broken; those two must never be
/// conflated, since only the former triggers the offline fallback.
#[allow(async_fn_in_trait)]
pub trait PrimaryStore {
    type Session: PrimarySession;

    async fn connect(&self) -> Result<Self::Session>;
}

/// One open session against the primary store.
///
/// Statement failures surface as `RemoteQuery`; transport failures after the
/// session opened surface as `ConnectionUnavailable`.
#[allow(async_fn_in_trait)]
pub trait PrimarySession {
    /// Fetch a user row by username for a credential check.
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<RemoteUser>>;

    /// Insert one expanded payment group atomically.
    ///
    /// Per entry: an application-level existence check on
    /// (member, year, month) skips already-recorded months, and the insert
    /// pair is conflict-ignoring on the deterministic transaction id, so a
    /// replayed group is a no-op. Returns the number of ledger rows actually
    /// inserted.
    async fn record_payment_group(&mut self, operator_id: i64, group: &PaymentGroup)
        -> Result<u32>;

    /// Insert a single non-membership ledger row (tithe, donation, parking,
    /// thanksgiving, expense, bag offering). Returns the new transaction id.
    async fn record_transaction(
        &mut self,
        operator_id: i64,
        kind: TransactionKind,
        member_id: Option<i64>,
        amount: f64,
    ) -> Result<Uuid>;

    /// Month numbers (1-12) already paid by a member in a year.
    async fn paid_months(&mut self, member_id: i64, year: i32) -> Result<Vec<u32>>;

    /// Full user list for the user mirror.
    async fn fetch_users(&mut self) -> Result<Vec<RemoteUser>>;

    /// Active members for the member mirror.
    async fn fetch_active_members(&mut self) -> Result<Vec<MemberRecord>>;

    /// Flattened membership history for the paid-period mirror.
    async fn fetch_paid_periods(&mut self) -> Result<Vec<PaidPeriod>>;
}
