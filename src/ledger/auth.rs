//! Operator sign-in.
//!
//! Online authentication checks the primary store's `users` table and, on
//! success, refreshes the offline mirrors so the next outage starts with
//! fresh reference data. When the store is unreachable the check runs
//! against the mirrored user copy instead; a credential that was valid at
//! the last refresh keeps working.

use tracing::warn;

use crate::error::{Result, SyncError};
use crate::ledger::{with_offline_fallback, OperatorSession};
use crate::local::LocalCache;
use crate::model::RemoteUser;
use crate::remote::{PrimarySession, PrimaryStore};
use crate::sync::{refresh_mirrors, StatusReporter};

/// Check a username/password pair, online first, mirrored copy when offline.
///
/// Returns `Ok(None)` for a wrong username or password; errors are reserved
/// for infrastructure failures. A successful online sign-in triggers a
/// best-effort mirror refresh before returning.
pub async fn authenticate<S: PrimaryStore>(
    store: &S,
    cache: &LocalCache,
    status: &StatusReporter,
    username: &str,
    password: &str,
) -> Result<Option<OperatorSession>> {
    if username.is_empty() || password.is_empty() {
        return Ok(None);
    }

    with_offline_fallback(
        status,
        async {
            let mut session = store.connect().await?;
            let user = session.find_user_by_username(username).await?;
            let operator = check_credentials(user.as_ref(), password)?;

            if operator.is_some() {
                status.set(format!("Signed in online as {username}."));
                // Stale mirrors are acceptable; a failed refresh must not
                // undo a successful sign-in.
                if let Err(err) = refresh_mirrors(store, cache, status).await {
                    warn!(error = %err, "post-login mirror refresh failed");
                }
            }
            Ok(operator)
        },
        || async {
            let user = cache.find_user(username).await?;
            let operator = check_credentials(user.as_ref(), password)?;
            if operator.is_some() {
                status.set(format!("Signed in using offline credentials: {username}."));
            }
            Ok(operator)
        },
    )
    .await
}

/// Verify a password against a (possibly absent) user row.
fn check_credentials(user: Option<&RemoteUser>, password: &str) -> Result<Option<OperatorSession>> {
    let Some(user) = user else {
        return Ok(None);
    };

    let valid = bcrypt::verify(password, &user.password_hash)
        .map_err(|_| SyncError::invalid(format!("stored password hash for {} is malformed", user.username)))?;

    Ok(valid.then(|| OperatorSession::from(user)))
}
