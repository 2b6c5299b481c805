//! Mirror refresh.
//!
//! Pulls the full current reference data (users, active members, paid-period
//! history) from the primary store and replaces the local mirror tables so
//! offline login and lookups keep working through the next outage. Runs
//! best-effort: if the primary store cannot be reached or queried the
//! refresh is skipped with a status update, never an error, because stale
//! mirrors are an acceptable degradation.

use tracing::warn;

use crate::error::Result;
use crate::local::LocalCache;
use crate::remote::{PrimarySession, PrimaryStore};
use crate::sync::StatusReporter;

/// What a refresh attempt did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// All three mirrors replaced with fresh snapshots
    Refreshed {
        users: usize,
        members: usize,
        periods: usize,
    },
    /// The primary store was not usable; mirrors left as they were
    Skipped(String),
}

/// Refresh all offline mirrors from the primary store.
///
/// Remote failures of any kind skip the refresh. A local storage failure
/// still propagates: there is nothing to fall back to beneath the cache.
pub async fn refresh_mirrors<S: PrimaryStore>(
    store: &S,
    cache: &LocalCache,
    status: &StatusReporter,
) -> Result<MirrorOutcome> {
    status.set("Refreshing offline mirrors...");

    let pulled = async {
        let mut session = store.connect().await?;
        let users = session.fetch_users().await?;
        let members = session.fetch_active_members().await?;
        let periods = session.fetch_paid_periods().await?;
        crate::error::Result::Ok((users, members, periods))
    }
    .await;

    let (users, members, periods) = match pulled {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(error = %err, "mirror refresh skipped");
            status.set("Mirror refresh skipped: primary store not available.");
            return Ok(MirrorOutcome::Skipped(err.to_string()));
        }
    };

    cache.replace_users(&users).await?;
    cache.replace_members(&members).await?;
    cache.replace_paid_periods(&periods).await?;

    status.set(format!(
        "Offline mirrors refreshed: {} users, {} members, {} paid periods.",
        users.len(),
        members.len(),
        periods.len()
    ));

    Ok(MirrorOutcome::Refreshed {
        users: users.len(),
        members: members.len(),
        periods: periods.len(),
    })
}
