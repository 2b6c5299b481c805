//! PostgreSQL session operations.
//!
//! All statements are parameterized SQL against the remote schema: the
//! `transactions` ledger, the `membership` detail table, and the `users` /
//! `members` reference tables. Every sqlx error goes through the central
//! classifier so transport loss mid-session is still recognized as an
//! outage.

use chrono::Utc;
use sqlx::{Connection, PgConnection};
use uuid::Uuid;

use crate::error::{classify_remote_error, Result};
use crate::model::{MemberRecord, PaidPeriod, PaymentGroup, RemoteUser, TransactionKind};
use crate::remote::PrimarySession;

/// One open session against the primary PostgreSQL store
pub struct PgSession {
    conn: PgConnection,
}

impl PgSession {
    pub(crate) fn new(conn: PgConnection) -> Self {
        Self { conn }
    }
}

impl PrimarySession for PgSession {
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<RemoteUser>> {
        sqlx::query_as::<_, RemoteUser>(
            r#"
            SELECT user_id, username, password_hash, full_name, role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&mut self.conn)
        .await
        .map_err(classify_remote_error)
    }

    async fn record_payment_group(
        &mut self,
        operator_id: i64,
        group: &PaymentGroup,
    ) -> Result<u32> {
        let mut tx = self.conn.begin().await.map_err(classify_remote_error)?;
        let transaction_date = Utc::now().date_naive();
        let mut inserted = 0u32;

        for entry in &group.entries {
            // At most one membership detail row per (member, year, month);
            // the schema does not enforce this, the application does.
            let already_paid: Option<(i32,)> = sqlx::query_as(
                r#"
                SELECT 1
                FROM membership
                WHERE member_id = $1 AND payment_year = $2 AND payment_month = $3
                "#,
            )
            .bind(group.member_id)
            .bind(group.year)
            .bind(entry.payment_date)
            .fetch_optional(&mut *tx)
            .await
            .map_err(classify_remote_error)?;

            if already_paid.is_some() {
                continue;
            }

            let result = sqlx::query(
                r#"
                INSERT INTO transactions
                    (transaction_id, member_id, user_id, transaction_type, amount, transaction_date)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (transaction_id) DO NOTHING
                "#,
            )
            .bind(entry.transaction_id)
            .bind(group.member_id)
            .bind(operator_id)
            .bind(TransactionKind::Membership.as_str())
            .bind(entry.amount)
            .bind(transaction_date)
            .execute(&mut *tx)
            .await
            .map_err(classify_remote_error)?;

            sqlx::query(
                r#"
                INSERT INTO membership (transaction_id, member_id, payment_month, payment_year)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (transaction_id) DO NOTHING
                "#,
            )
            .bind(entry.transaction_id)
            .bind(group.member_id)
            .bind(entry.payment_date)
            .bind(group.year)
            .execute(&mut *tx)
            .await
            .map_err(classify_remote_error)?;

            inserted += result.rows_affected() as u32;
        }

        tx.commit().await.map_err(classify_remote_error)?;
        Ok(inserted)
    }

    async fn record_transaction(
        &mut self,
        operator_id: i64,
        kind: TransactionKind,
        member_id: Option<i64>,
        amount: f64,
    ) -> Result<Uuid> {
        let transaction_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO transactions
                (transaction_id, member_id, user_id, transaction_type, amount, transaction_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(transaction_id)
        .bind(member_id)
        .bind(operator_id)
        .bind(kind.as_str())
        .bind(kind.signed_amount(amount))
        .bind(Utc::now().date_naive())
        .execute(&mut self.conn)
        .await
        .map_err(classify_remote_error)?;

        Ok(transaction_id)
    }

    async fn paid_months(&mut self, member_id: i64, year: i32) -> Result<Vec<u32>> {
        let months: Vec<(i32,)> = sqlx::query_as(
            r#"
            SELECT EXTRACT(MONTH FROM payment_month)::int
            FROM membership
            WHERE member_id = $1 AND payment_year = $2
            ORDER BY 1
            "#,
        )
        .bind(member_id)
        .bind(year)
        .fetch_all(&mut self.conn)
        .await
        .map_err(classify_remote_error)?;

        Ok(months.into_iter().map(|(m,)| m as u32).collect())
    }

    async fn fetch_users(&mut self) -> Result<Vec<RemoteUser>> {
        sqlx::query_as::<_, RemoteUser>(
            r#"
            SELECT user_id, username, password_hash, full_name, role
            FROM users
            ORDER BY user_id
            "#,
        )
        .fetch_all(&mut self.conn)
        .await
        .map_err(classify_remote_error)
    }

    async fn fetch_active_members(&mut self) -> Result<Vec<MemberRecord>> {
        sqlx::query_as::<_, MemberRecord>(
            r#"
            SELECT member_id, membership_card_no, first_name, last_name
            FROM members
            WHERE status = 'active'
            ORDER BY member_id
            "#,
        )
        .fetch_all(&mut self.conn)
        .await
        .map_err(classify_remote_error)
    }

    async fn fetch_paid_periods(&mut self) -> Result<Vec<PaidPeriod>> {
        sqlx::query_as::<_, PaidPeriod>(
            r#"
            SELECT member_id, payment_year, EXTRACT(MONTH FROM payment_month)::int AS payment_month
            FROM membership
            ORDER BY member_id, payment_year, payment_month
            "#,
        )
        .fetch_all(&mut self.conn)
        .await
        .map_err(classify_remote_error)
    }
}
