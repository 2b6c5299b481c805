//! Common test utilities and helpers
//!
//! Provides an in-memory stand-in for the primary store plus probe and
//! operator fixtures shared by the integration tests. The fake honors the
//! same contract as the PostgreSQL session: conflict-ignoring inserts keyed
//! by transaction id, an application-level (member, year, month) existence
//! check, and injectable failures.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{Datelike, Month, NaiveDate, Utc};
use uuid::Uuid;

use parish_ledger::model::{MemberRecord, PaidPeriod, PaymentGroup, RemoteUser, TransactionKind};
use parish_ledger::remote::{PrimarySession, PrimaryStore};
use parish_ledger::sync::ConnectivityProbe;
use parish_ledger::{OperatorSession, Result, SyncError};

/// A row in the fake `transactions` ledger
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub transaction_id: Uuid,
    pub member_id: Option<i64>,
    pub user_id: i64,
    pub transaction_type: String,
    pub amount: f64,
    pub transaction_date: NaiveDate,
}

/// A row in the fake `membership` detail table
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipRow {
    pub transaction_id: Uuid,
    pub member_id: i64,
    pub payment_date: NaiveDate,
    pub payment_year: i32,
}

/// Shared mutable state behind the fake store
#[derive(Debug, Default)]
pub struct FakeState {
    pub transactions: Vec<LedgerRow>,
    pub membership: Vec<MembershipRow>,
    pub users: Vec<RemoteUser>,
    pub members: Vec<MemberRecord>,

    /// Refuse every connect attempt with `ConnectionUnavailable`
    pub refuse_connections: bool,
    /// Member ids whose payment groups fail with a constraint error
    pub fail_members: HashSet<i64>,
    /// One-shot: the next payment group commits but the acknowledgement is
    /// lost, reported to the caller as a dropped connection
    pub lose_ack_once: bool,
    /// One-shot error message for the next single-transaction insert
    pub fail_next_transaction: Option<String>,
}

/// In-memory primary store double
#[derive(Clone)]
pub struct FakePrimary {
    pub state: Arc<Mutex<FakeState>>,
    /// Connect attempts, successful or refused
    pub connects: Arc<AtomicUsize>,
}

impl FakePrimary {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            connects: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn connect_attempts(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn set_refuse_connections(&self, refuse: bool) {
        self.state.lock().unwrap().refuse_connections = refuse;
    }

    pub fn fail_member(&self, member_id: i64) {
        self.state.lock().unwrap().fail_members.insert(member_id);
    }

    pub fn lose_next_ack(&self) {
        self.state.lock().unwrap().lose_ack_once = true;
    }

    pub fn fail_next_transaction(&self, message: &str) {
        self.state.lock().unwrap().fail_next_transaction = Some(message.to_string());
    }

    pub fn seed_user(&self, user_id: i64, username: &str, password: &str) {
        self.state.lock().unwrap().users.push(RemoteUser {
            user_id,
            username: username.to_string(),
            password_hash: bcrypt::hash(password, 4).unwrap(),
            full_name: format!("{username} (full name)"),
            role: "staff".to_string(),
        });
    }

    pub fn seed_member(&self, member_id: i64, card_no: &str) {
        self.state.lock().unwrap().members.push(MemberRecord {
            member_id,
            membership_card_no: Some(card_no.to_string()),
            first_name: "Member".to_string(),
            last_name: format!("No{member_id}"),
        });
    }

    /// Plant an already-paid month directly in the remote history.
    pub fn seed_paid_month(&self, member_id: i64, year: i32, month: Month) {
        let payment_date = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1).unwrap();
        self.state.lock().unwrap().membership.push(MembershipRow {
            transaction_id: Uuid::new_v4(),
            member_id,
            payment_date,
            payment_year: year,
        });
    }

    pub fn transaction_count(&self) -> usize {
        self.state.lock().unwrap().transactions.len()
    }

    pub fn membership_count(&self) -> usize {
        self.state.lock().unwrap().membership.len()
    }

    /// Ledger rows recorded for a member, in insert order.
    pub fn transactions_for(&self, member_id: i64) -> Vec<LedgerRow> {
        self.state
            .lock()
            .unwrap()
            .transactions
            .iter()
            .filter(|row| row.member_id == Some(member_id))
            .cloned()
            .collect()
    }
}

impl PrimaryStore for FakePrimary {
    type Session = FakeSession;

    async fn connect(&self) -> Result<Self::Session> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.state.lock().unwrap().refuse_connections {
            return Err(SyncError::unreachable("fake primary refusing connections"));
        }
        Ok(FakeSession {
            state: Arc::clone(&self.state),
        })
    }
}

pub struct FakeSession {
    state: Arc<Mutex<FakeState>>,
}

impl PrimarySession for FakeSession {
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<RemoteUser>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn record_payment_group(
        &mut self,
        operator_id: i64,
        group: &PaymentGroup,
    ) -> Result<u32> {
        let mut state = self.state.lock().unwrap();

        if state.fail_members.contains(&group.member_id) {
            return Err(SyncError::remote(
                "duplicate key value violates unique constraint",
            ));
        }

        let transaction_date = Utc::now().date_naive();
        let mut inserted = 0u32;

        for entry in &group.entries {
            let period_taken = state.membership.iter().any(|row| {
                row.member_id == group.member_id
                    && row.payment_year == group.year
                    && row.payment_date == entry.payment_date
            });
            let id_taken = state
                .transactions
                .iter()
                .any(|row| row.transaction_id == entry.transaction_id);
            if period_taken || id_taken {
                continue;
            }

            state.transactions.push(LedgerRow {
                transaction_id: entry.transaction_id,
                member_id: Some(group.member_id),
                user_id: operator_id,
                transaction_type: TransactionKind::Membership.as_str().to_string(),
                amount: entry.amount,
                transaction_date,
            });
            state.membership.push(MembershipRow {
                transaction_id: entry.transaction_id,
                member_id: group.member_id,
                payment_date: entry.payment_date,
                payment_year: group.year,
            });
            inserted += 1;
        }

        if state.lose_ack_once {
            // The rows above stay committed; only the acknowledgement is lost
            state.lose_ack_once = false;
            return Err(SyncError::unreachable(
                "connection reset while awaiting commit acknowledgement",
            ));
        }

        Ok(inserted)
    }

    async fn record_transaction(
        &mut self,
        operator_id: i64,
        kind: TransactionKind,
        member_id: Option<i64>,
        amount: f64,
    ) -> Result<Uuid> {
        let mut state = self.state.lock().unwrap();

        if let Some(message) = state.fail_next_transaction.take() {
            return Err(SyncError::remote(message));
        }

        let transaction_id = Uuid::new_v4();
        state.transactions.push(LedgerRow {
            transaction_id,
            member_id,
            user_id: operator_id,
            transaction_type: kind.as_str().to_string(),
            amount: kind.signed_amount(amount),
            transaction_date: Utc::now().date_naive(),
        });
        Ok(transaction_id)
    }

    async fn paid_months(&mut self, member_id: i64, year: i32) -> Result<Vec<u32>> {
        let state = self.state.lock().unwrap();
        let mut months: Vec<u32> = state
            .membership
            .iter()
            .filter(|row| row.member_id == member_id && row.payment_year == year)
            .map(|row| row.payment_date.month())
            .collect();
        months.sort_unstable();
        months.dedup();
        Ok(months)
    }

    async fn fetch_users(&mut self) -> Result<Vec<RemoteUser>> {
        Ok(self.state.lock().unwrap().users.clone())
    }

    async fn fetch_active_members(&mut self) -> Result<Vec<MemberRecord>> {
        Ok(self.state.lock().unwrap().members.clone())
    }

    async fn fetch_paid_periods(&mut self) -> Result<Vec<PaidPeriod>> {
        let state = self.state.lock().unwrap();
        let mut periods: Vec<PaidPeriod> = state
            .membership
            .iter()
            .map(|row| PaidPeriod {
                member_id: row.member_id,
                payment_year: row.payment_year,
                payment_month: row.payment_date.month() as i32,
            })
            .collect();
        periods.sort_by_key(|p| (p.member_id, p.payment_year, p.payment_month));
        periods.dedup();
        Ok(periods)
    }
}

/// Operator fixture; no login flow required.
pub fn operator() -> OperatorSession {
    OperatorSession {
        user_id: 1,
        username: "clerk".to_string(),
        full_name: "Parish Clerk".to_string(),
        role: "staff".to_string(),
    }
}

/// A probe that reports reachable; keep the returned listener alive for the
/// duration of the test.
pub async fn live_probe() -> (ConnectivityProbe, tokio::net::TcpListener) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (
        ConnectivityProbe::with_endpoint(addr.to_string(), Duration::from_secs(1)),
        listener,
    )
}

/// A probe pointed at a port nothing listens on.
pub fn dead_probe() -> ConnectivityProbe {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ConnectivityProbe::with_endpoint(addr.to_string(), Duration::from_millis(300))
}
