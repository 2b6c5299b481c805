//! # Ledger Entry Points
//!
//! The operations the form windows call: recording payments, looking up
//! paid months, and signing an operator in. Each write takes an explicit
//! [`OperatorSession`] rather than reading an ambient current-user global,
//! so the queue and drain paths are testable without a login flow.
//!
//! The offline contract is enforced in exactly one place,
//! [`with_offline_fallback`]: attempt the primary store, convert exactly one
//! `ConnectionUnavailable` into the supplied fallback, and propagate every
//! other error unmodified. A constraint violation or syntax error is never
//! mistaken for an outage.

mod auth;
mod membership;
mod transactions;

pub use auth::authenticate;
pub use membership::{paid_months_for_year, record_membership_payment, PaymentConfirmation};
pub use transactions::record_transaction;

use std::future::Future;

use tracing::warn;

use crate::error::{Result, SyncError};
use crate::model::RemoteUser;
use crate::sync::StatusReporter;

/// The signed-in operator, stamped onto every ledger row
#[derive(Debug, Clone)]
pub struct OperatorSession {
    pub user_id: i64,
    pub username: String,
    pub full_name: String,
    pub role: String,
}

impl From<&RemoteUser> for OperatorSession {
    fn from(user: &RemoteUser) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            role: user.role.clone(),
        }
    }
}

/// Attempt the primary store; fall back to the local cache only when the
/// store is unreachable.
///
/// This is the single shared resilient-call helper every online-with-offline
/// operation goes through. The fallback is constructed lazily and runs at
/// most once.
pub async fn with_offline_fallback<T, Fut, Fb, FbFut>(
    status: &StatusReporter,
    primary: Fut,
    fallback: Fb,
) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
    Fb: FnOnce() -> FbFut,
    FbFut: Future<Output = Result<T>>,
{
    match primary.await {
        Err(SyncError::ConnectionUnavailable(reason)) => {
            warn!(%reason, "primary store unreachable, using offline fallback");
            status.set("Primary store unreachable — working offline.");
            fallback().await
        }
        other => other,
    }
}
