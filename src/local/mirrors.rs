//! Mirror-table replacement and offline lookups.
//!
//! Each `replace_*` call swaps a mirror table's full contents inside one
//! transaction, so a reader on the other thread sees either the old snapshot
//! or the new one, never a half-replaced mix. Lookups are the offline
//! counterparts of the primary-store queries: absent rows are empty results,
//! not errors.

use sqlx::Row;

use crate::error::{local_store_error, Result};
use crate::local::LocalCache;
use crate::model::{MemberRecord, PaidPeriod, RemoteUser};

impl LocalCache {
    /// Replace the user mirror with a fresh snapshot.
    pub async fn replace_users(&self, users: &[RemoteUser]) -> Result<()> {
        let mut tx = self.pool().begin().await.map_err(local_store_error)?;

        sqlx::query("DELETE FROM local_users")
            .execute(&mut *tx)
            .await
            .map_err(local_store_error)?;

        for user in users {
            sqlx::query(
                "INSERT OR REPLACE INTO local_users (user_id, username, password_hash, full_name, role)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(user.user_id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.full_name)
            .bind(&user.role)
            .execute(&mut *tx)
            .await
            .map_err(local_store_error)?;
        }

        tx.commit().await.map_err(local_store_error)
    }

    /// Replace the member mirror with a fresh snapshot.
    pub async fn replace_members(&self, members: &[MemberRecord]) -> Result<()> {
        let mut tx = self.pool().begin().await.map_err(local_store_error)?;

        sqlx::query("DELETE FROM local_members")
            .execute(&mut *tx)
            .await
            .map_err(local_store_error)?;

        for member in members {
            sqlx::query(
                "INSERT OR REPLACE INTO local_members (member_id, membership_card_no, first_name, last_name)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(member.member_id)
            .bind(&member.membership_card_no)
            .bind(&member.first_name)
            .bind(&member.last_name)
            .execute(&mut *tx)
            .await
            .map_err(local_store_error)?;
        }

        tx.commit().await.map_err(local_store_error)
    }

    /// Replace the paid-period mirror with a fresh snapshot.
    pub async fn replace_paid_periods(&self, periods: &[PaidPeriod]) -> Result<()> {
        let mut tx = self.pool().begin().await.map_err(local_store_error)?;

        sqlx::query("DELETE FROM local_paid_periods")
            .execute(&mut *tx)
            .await
            .map_err(local_store_error)?;

        for period in periods {
            sqlx::query(
                "INSERT OR REPLACE INTO local_paid_periods (member_id, payment_year, payment_month)
                 VALUES (?, ?, ?)",
            )
            .bind(period.member_id)
            .bind(period.payment_year)
            .bind(period.payment_month)
            .execute(&mut *tx)
            .await
            .map_err(local_store_error)?;
        }

        tx.commit().await.map_err(local_store_error)
    }

    /// Offline credential lookup by username.
    pub async fn find_user(&self, username: &str) -> Result<Option<RemoteUser>> {
        sqlx::query_as::<_, RemoteUser>(
            "SELECT user_id, username, password_hash, full_name, role
             FROM local_users
             WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await
        .map_err(local_store_error)
    }

    /// Offline member lookup by membership card number.
    pub async fn find_member_by_card(&self, card_no: &str) -> Result<Option<MemberRecord>> {
        sqlx::query_as::<_, MemberRecord>(
            "SELECT member_id, membership_card_no, first_name, last_name
             FROM local_members
             WHERE membership_card_no = ?",
        )
        .bind(card_no)
        .fetch_optional(self.pool())
        .await
        .map_err(local_store_error)
    }

    /// Offline member lookup by id.
    pub async fn find_member_by_id(&self, member_id: i64) -> Result<Option<MemberRecord>> {
        sqlx::query_as::<_, MemberRecord>(
            "SELECT member_id, membership_card_no, first_name, last_name
             FROM local_members
             WHERE member_id = ?",
        )
        .bind(member_id)
        .fetch_optional(self.pool())
        .await
        .map_err(local_store_error)
    }

    /// Month numbers (1-12) the mirror shows as already paid for a member
    /// and year. Reflects only synced history pulled from the primary store;
    /// queued-but-undrained payments are not part of the mirror.
    pub async fn paid_months(&self, member_id: i64, year: i32) -> Result<Vec<u32>> {
        let rows = sqlx::query(
            "SELECT payment_month FROM local_paid_periods
             WHERE member_id = ? AND payment_year = ?
             ORDER BY payment_month ASC",
        )
        .bind(member_id)
        .bind(year)
        .fetch_all(self.pool())
        .await
        .map_err(local_store_error)?;

        rows.iter()
            .map(|row| {
                row.try_get::<i32, _>("payment_month")
                    .map(|m| m as u32)
                    .map_err(local_store_error)
            })
            .collect()
    }

    /// Full paid-period mirror contents, ordered; used for snapshot
    /// comparison and diagnostics.
    pub async fn all_paid_periods(&self) -> Result<Vec<PaidPeriod>> {
        sqlx::query_as::<_, PaidPeriod>(
            "SELECT member_id, payment_year, payment_month
             FROM local_paid_periods
             ORDER BY member_id, payment_year, payment_month",
        )
        .fetch_all(self.pool())
        .await
        .map_err(local_store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(user_id: i64, username: &str) -> RemoteUser {
        RemoteUser {
            user_id,
            username: username.to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            full_name: "Test User".to_string(),
            role: "staff".to_string(),
        }
    }

    #[tokio::test]
    async fn test_replace_users_is_a_full_swap() {
        let cache = LocalCache::open_in_memory().await.unwrap();

        cache
            .replace_users(&[user(1, "amos"), user(2, "beth")])
            .await
            .unwrap();
        assert!(cache.find_user("amos").await.unwrap().is_some());

        // A second snapshot without "amos" removes the stale row
        cache.replace_users(&[user(2, "beth")]).await.unwrap();
        assert!(cache.find_user("amos").await.unwrap().is_none());
        assert!(cache.find_user("beth").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_absent_lookups_return_empty() {
        let cache = LocalCache::open_in_memory().await.unwrap();

        assert!(cache.find_user("nobody").await.unwrap().is_none());
        assert!(cache.find_member_by_card("C-000").await.unwrap().is_none());
        assert!(cache.paid_months(99, 2025).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_paid_months_filters_by_member_and_year() {
        let cache = LocalCache::open_in_memory().await.unwrap();

        cache
            .replace_paid_periods(&[
                PaidPeriod {
                    member_id: 42,
                    payment_year: 2025,
                    payment_month: 3,
                },
                PaidPeriod {
                    member_id: 42,
                    payment_year: 2025,
                    payment_month: 1,
                },
                PaidPeriod {
                    member_id: 42,
                    payment_year: 2024,
                    payment_month: 12,
                },
                PaidPeriod {
                    member_id: 7,
                    payment_year: 2025,
                    payment_month: 6,
                },
            ])
            .await
            .unwrap();

        assert_eq!(cache.paid_months(42, 2025).await.unwrap(), vec![1, 3]);
    }
}
