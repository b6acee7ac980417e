//! Booking expiry sweep.
//!
//! Runs both expiry transitions in order and validates what the repository
//! reported. Callers decide what to do with the outcome: the request
//! middleware logs and swallows it, the admin endpoint and CLI report it.

use serde::Serialize;
use tracing::debug;

use crate::repositories::BookingRepository;

pub const PENDING_PAYMENTS_OPERATION: &str = "process_expired_pending_payments";
pub const CHECKOUTS_OPERATION: &str = "process_expired_checkouts";

/// Number of records moved by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub pending_payments_expired: u64,
    pub checkouts_expired: u64,
}

impl SweepReport {
    pub fn total(&self) -> u64 {
        self.pending_payments_expired + self.checkouts_expired
    }

    pub fn is_idle(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// The repository answered with something that is not a record count.
    #[error("{operation} returned an invalid count: {value}")]
    InvalidCount { operation: &'static str, value: i64 },

    #[error("{operation} failed: {cause:#}")]
    Repository {
        operation: &'static str,
        cause: anyhow::Error,
    },
}

impl SweepError {
    pub fn operation(&self) -> &'static str {
        match self {
            SweepError::InvalidCount { operation, .. } => operation,
            SweepError::Repository { operation, .. } => operation,
        }
    }

    /// Structural errors are repository contract violations rather than
    /// runtime failures.
    pub fn is_structural(&self) -> bool {
        matches!(self, SweepError::InvalidCount { .. })
    }
}

/// Expire stale pending-payment bookings, then stale checkouts.
///
/// The second call is not attempted when the first fails.
pub async fn run_expiry_sweep(repo: &dyn BookingRepository) -> Result<SweepReport, SweepError> {
    let pending = repo
        .process_expired_pending_payments()
        .await
        .map_err(|cause| SweepError::Repository {
            operation: PENDING_PAYMENTS_OPERATION,
            cause,
        })?;

    let checkouts = repo
        .process_expired_checkouts()
        .await
        .map_err(|cause| SweepError::Repository {
            operation: CHECKOUTS_OPERATION,
            cause,
        })?;

    let report = SweepReport {
        pending_payments_expired: validate_count(PENDING_PAYMENTS_OPERATION, pending)?,
        checkouts_expired: validate_count(CHECKOUTS_OPERATION, checkouts)?,
    };

    debug!(
        pending_payments_expired = report.pending_payments_expired,
        checkouts_expired = report.checkouts_expired,
        "Booking expiry sweep finished"
    );

    Ok(report)
}

fn validate_count(operation: &'static str, value: i64) -> Result<u64, SweepError> {
    u64::try_from(value).map_err(|_| SweepError::InvalidCount { operation, value })
}
