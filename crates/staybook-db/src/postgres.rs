use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use staybook_models::{BookingStatus, PaymentStatus, Role, UserRecord};
use tracing::instrument;

use crate::repositories::{AuthenticationRepository, BookingRepository};

#[derive(Clone, Debug)]
pub struct PgAuthenticationRepository {
    pool: PgPool,
}

impl PgAuthenticationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user with the given role. Used by the admin CLI.
    #[instrument(skip(self))]
    pub async fn create_user(
        &self,
        email: &str,
        username: &str,
        role: Role,
    ) -> anyhow::Result<UserRecord> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, email_verified, username, role)
            VALUES ($1, TRUE, $2, $3)
            RETURNING id, email, email_verified, username, preferred_language, preferred_currency, role
            "#,
        )
        .bind(email)
        .bind(username)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .context("failed to create user")
    }
}

#[async_trait]
impl AuthenticationRepository for PgAuthenticationRepository {
    #[instrument(skip(self))]
    async fn find_user_by_email_for_auth(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, email_verified, username, preferred_language, preferred_currency, role
            FROM users
            WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("failed to look up user by email")
    }
}

#[derive(Clone, Debug)]
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    #[instrument(skip(self))]
    async fn process_expired_pending_payments(&self) -> anyhow::Result<i64> {
        // Data-modifying CTEs run exactly once even when unreferenced by the
        // outer SELECT.
        sqlx::query_scalar::<_, i64>(
            r#"
            WITH expired AS (
                UPDATE bookings
                SET status = $1,
                    cancellation_reason = 'payment_window_elapsed',
                    updated_at = NOW()
                WHERE status = $2 AND payment_expires_at < NOW()
                RETURNING id
            ), expired_payments AS (
                UPDATE payments
                SET status = $3, updated_at = NOW()
                WHERE status = $4 AND booking_id IN (SELECT id FROM expired)
                RETURNING id
            )
            SELECT COUNT(*) FROM expired
            "#,
        )
        .bind(BookingStatus::Cancelled.as_str())
        .bind(BookingStatus::PendingPayment.as_str())
        .bind(PaymentStatus::Expired.as_str())
        .bind(PaymentStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
        .context("failed to expire pending-payment bookings")
    }

    #[instrument(skip(self))]
    async fn process_expired_checkouts(&self) -> anyhow::Result<i64> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $1, updated_at = NOW()
            WHERE status = $2 AND checkout_expires_at < NOW()
            "#,
        )
        .bind(BookingStatus::Expired.as_str())
        .bind(BookingStatus::CheckedOut.as_str())
        .execute(&self.pool)
        .await
        .context("failed to expire stale checkouts")?;

        i64::try_from(result.rows_affected()).context("affected row count out of range")
    }
}
