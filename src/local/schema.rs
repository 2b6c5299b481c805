//! Local cache schema.
//!
//! Mirror tables are fully replaceable copies keyed by their remote primary
//! ids; the queue table is the only locally-authored state. `months` stores
//! the comma-separated month-name list exactly as entered, and
//! `transaction_uuid` is unique so a payment can never be queued twice.

pub(crate) const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS local_users (
        user_id INTEGER PRIMARY KEY,
        username TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        full_name TEXT NOT NULL,
        role TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS local_members (
        member_id INTEGER PRIMARY KEY,
        membership_card_no TEXT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS local_paid_periods (
        member_id INTEGER NOT NULL,
        payment_year INTEGER NOT NULL,
        payment_month INTEGER NOT NULL,
        PRIMARY KEY (member_id, payment_year, payment_month)
    )",
    "CREATE TABLE IF NOT EXISTS pending_membership_payments (
        local_id INTEGER PRIMARY KEY AUTOINCREMENT,
        member_id INTEGER NOT NULL,
        year INTEGER NOT NULL,
        months TEXT NOT NULL,
        total_amount REAL NOT NULL,
        amount_per_month REAL NOT NULL,
        created_at TEXT NOT NULL,
        transaction_uuid TEXT NOT NULL UNIQUE,
        synced INTEGER NOT NULL DEFAULT 0
    )",
];
