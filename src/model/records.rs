//! Row types for the mirror tables and the pending-write queue.

use serde::{Deserialize, Serialize};

/// User row as stored in the primary store and mirrored locally
///
/// The mirrored copy is a point-in-time snapshot used for offline credential
/// checks; `password_hash` is the bcrypt hash copied verbatim so that
/// verification behaves identically on both sides of an outage.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RemoteUser {
    /// Unique user ID
    pub user_id: i64,
    /// Username (unique)
    pub username: String,
    /// bcrypt password hash
    pub password_hash: String,
    /// Display name
    pub full_name: String,
    /// Role tag (e.g. "staff", "admin")
    pub role: String,
}

/// Member row mirrored locally for offline card/ID lookup
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberRecord {
    /// Unique member ID
    pub member_id: i64,
    /// Membership card number printed on the physical card
    pub membership_card_no: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

/// Flattened paid-period row: one row per month a member has already paid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PaidPeriod {
    pub member_id: i64,
    pub payment_year: i32,
    /// Month number, 1-12
    pub payment_month: i32,
}

/// A membership payment recorded while the primary store was unreachable
///
/// Created the moment an offline write is attempted; consumed (deleted) by a
/// successful drain pass; left untouched when its replay fails. `months` is
/// the comma-separated month-name list exactly as entered, and
/// `transaction_uuid` is the idempotence token the drain derives the remote
/// transaction ids from.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PendingPayment {
    /// Auto-incrementing local key; drain order is ascending `local_id`
    pub local_id: i64,
    pub member_id: i64,
    pub year: i32,
    /// Comma-separated month names, e.g. "January,February"
    pub months: String,
    pub total_amount: f64,
    /// Stored for display and audit; the drain recomputes the split
    pub amount_per_month: f64,
    /// RFC 3339 timestamp of the offline save
    pub created_at: String,
    /// Client-generated group id, unique per queued payment
    pub transaction_uuid: String,
    /// Audit flag; committed rows are normally deleted outright
    pub synced: bool,
}
