//! Drain-pass behavior: success, partial failure, postponement, and
//! idempotence across retries.

mod common;

use chrono::Month;
use pretty_assertions::assert_eq;

use common::{dead_probe, live_probe, operator, FakePrimary};
use parish_ledger::sync::StatusReporter;
use parish_ledger::{drain_pending, LocalCache};

/// Given N queued items and a reachable primary store where every replay
/// succeeds, the queue ends empty with `synced == N`.
#[tokio::test]
async fn queue_drains_to_empty_on_success() {
    let store = FakePrimary::new();
    let cache = LocalCache::open_in_memory().await.unwrap();
    let (probe, _listener) = live_probe().await;
    let status = StatusReporter::new();

    cache
        .enqueue_pending_payment(1, &[Month::January], 2025, 100.0)
        .await
        .unwrap();
    cache
        .enqueue_pending_payment(2, &[Month::January, Month::February], 2025, 200.0)
        .await
        .unwrap();
    cache
        .enqueue_pending_payment(3, &[Month::March], 2025, 150.0)
        .await
        .unwrap();

    let report = drain_pending(&store, &cache, &probe, &status, &operator())
        .await
        .unwrap();

    assert_eq!(report.synced, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(report.message, "Sync complete: 3 uploaded, 0 failed.");
    assert_eq!(cache.pending_count().await.unwrap(), 0);
    // One ledger row per month across the three groups
    assert_eq!(store.transaction_count(), 4);
    assert_eq!(store.membership_count(), 4);
    assert_eq!(status.get(), "Sync complete: 3 uploaded, 0 failed.");
}

/// The number of ledger rows for a payment group equals its month count
/// exactly once, even when a pass is interrupted between remote commit and
/// local delete and the row is replayed.
#[tokio::test]
async fn drain_is_idempotent_across_retries() {
    let store = FakePrimary::new();
    let cache = LocalCache::open_in_memory().await.unwrap();
    let (probe, _listener) = live_probe().await;
    let status = StatusReporter::new();

    cache
        .enqueue_pending_payment(42, &[Month::January, Month::February], 2025, 1000.0)
        .await
        .unwrap();

    // First pass: the commit lands but the acknowledgement is lost, so the
    // queue row survives.
    store.lose_next_ack();
    let first = drain_pending(&store, &cache, &probe, &status, &operator())
        .await
        .unwrap();
    assert_eq!(first.synced, 0);
    assert_eq!(first.failed, 1);
    assert_eq!(cache.pending_count().await.unwrap(), 1);
    assert_eq!(store.transaction_count(), 2);

    // Retry: the same group replays under the same derived ids and inserts
    // nothing new; the queue row is finally removed.
    let second = drain_pending(&store, &cache, &probe, &status, &operator())
        .await
        .unwrap();
    assert_eq!(second.synced, 1);
    assert_eq!(second.failed, 0);
    assert_eq!(cache.pending_count().await.unwrap(), 0);
    assert_eq!(store.transaction_count(), 2);
    assert_eq!(store.membership_count(), 2);

    // And a third pass finds nothing to do
    let third = drain_pending(&store, &cache, &probe, &status, &operator())
        .await
        .unwrap();
    assert_eq!(third.message, "No pending offline records.");
    assert_eq!(store.transaction_count(), 2);
}

/// When the probe says unreachable the drain performs zero remote calls and
/// leaves the queue untouched.
#[tokio::test]
async fn unreachable_probe_short_circuits_drain() {
    let store = FakePrimary::new();
    let cache = LocalCache::open_in_memory().await.unwrap();
    let status = StatusReporter::new();

    cache
        .enqueue_pending_payment(1, &[Month::June], 2025, 75.0)
        .await
        .unwrap();

    let report = drain_pending(&store, &cache, &dead_probe(), &status, &operator())
        .await
        .unwrap();

    assert_eq!(report.synced, 0);
    assert_eq!(report.failed, 0);
    assert_eq!(report.message, "Offline — sync postponed.");
    assert_eq!(store.connect_attempts(), 0);
    assert_eq!(cache.pending_count().await.unwrap(), 1);
}

/// The probe is advisory: if it passes but the store itself refuses the
/// session, the whole pass is postponed with the queue intact.
#[tokio::test]
async fn refused_session_postpones_the_pass() {
    let store = FakePrimary::new();
    store.set_refuse_connections(true);
    let cache = LocalCache::open_in_memory().await.unwrap();
    let (probe, _listener) = live_probe().await;
    let status = StatusReporter::new();

    cache
        .enqueue_pending_payment(1, &[Month::June], 2025, 75.0)
        .await
        .unwrap();

    let report = drain_pending(&store, &cache, &probe, &status, &operator())
        .await
        .unwrap();

    assert_eq!(report.synced, 0);
    assert_eq!(report.failed, 0);
    assert_eq!(cache.pending_count().await.unwrap(), 1);
    assert_eq!(store.transaction_count(), 0);
}

/// Two queued rows, the second hits a constraint error: one synced, one
/// failed, and exactly the failed row remains queued.
#[tokio::test]
async fn one_failed_item_does_not_abort_the_pass() {
    let store = FakePrimary::new();
    store.fail_member(2);
    let cache = LocalCache::open_in_memory().await.unwrap();
    let (probe, _listener) = live_probe().await;
    let status = StatusReporter::new();

    cache
        .enqueue_pending_payment(1, &[Month::January], 2025, 100.0)
        .await
        .unwrap();
    cache
        .enqueue_pending_payment(2, &[Month::January], 2025, 100.0)
        .await
        .unwrap();

    let report = drain_pending(&store, &cache, &probe, &status, &operator())
        .await
        .unwrap();

    assert_eq!(report.synced, 1);
    assert_eq!(report.failed, 1);

    let remaining = cache.pending_payments().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].member_id, 2);
}

/// Rows replay oldest-first, so later payments can rely on earlier ones
/// having landed.
#[tokio::test]
async fn drain_replays_in_fifo_order() {
    let store = FakePrimary::new();
    let cache = LocalCache::open_in_memory().await.unwrap();
    let (probe, _listener) = live_probe().await;
    let status = StatusReporter::new();

    for member_id in [10, 11, 12] {
        cache
            .enqueue_pending_payment(member_id, &[Month::April], 2025, 50.0)
            .await
            .unwrap();
    }

    drain_pending(&store, &cache, &probe, &status, &operator())
        .await
        .unwrap();

    let order: Vec<Option<i64>> = store
        .state
        .lock()
        .unwrap()
        .transactions
        .iter()
        .map(|row| row.member_id)
        .collect();
    assert_eq!(order, vec![Some(10), Some(11), Some(12)]);
}

/// The drain recomputes the per-month split from the stored total, so the
/// remote rows follow the remote rounding rules.
#[tokio::test]
async fn drain_recomputes_per_month_amount() {
    let store = FakePrimary::new();
    let cache = LocalCache::open_in_memory().await.unwrap();
    let (probe, _listener) = live_probe().await;
    let status = StatusReporter::new();

    cache
        .enqueue_pending_payment(
            5,
            &[Month::January, Month::February, Month::March],
            2025,
            100.0,
        )
        .await
        .unwrap();

    drain_pending(&store, &cache, &probe, &status, &operator())
        .await
        .unwrap();

    for row in store.transactions_for(5) {
        assert_eq!(row.amount, 33.33);
    }
}
