//! Repository traits consumed by the request pipeline.
//!
//! The pipeline only depends on these traits; the PostgreSQL implementations
//! live in [`crate::postgres`] and tests substitute in-memory fakes.

use async_trait::async_trait;
use staybook_models::UserRecord;

/// Looks up users for token verification.
#[async_trait]
pub trait AuthenticationRepository: Send + Sync {
    /// Find the active user with this email (case-insensitive).
    async fn find_user_by_email_for_auth(&self, email: &str) -> anyhow::Result<Option<UserRecord>>;
}

/// Time-based booking transitions.
///
/// Both operations are idempotent "expire if stale" updates and must tolerate
/// being run concurrently from several requests.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Cancel bookings whose payment window elapsed and expire their pending
    /// payments. Returns the number of bookings cancelled.
    async fn process_expired_pending_payments(&self) -> anyhow::Result<i64>;

    /// Expire bookings whose checkout hold elapsed. Returns the number of
    /// bookings expired.
    async fn process_expired_checkouts(&self) -> anyhow::Result<i64>;
}
