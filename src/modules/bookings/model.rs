use serde::Serialize;
use utoipa::ToSchema;

use staybook_db::SweepReport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ExpireBookingsResponse {
    /// Pending-payment bookings cancelled because their payment window elapsed
    pub pending_payments_expired: u64,
    /// Checkouts moved to expired
    pub checkouts_expired: u64,
}

impl From<SweepReport> for ExpireBookingsResponse {
    fn from(report: SweepReport) -> Self {
        Self {
            pending_payments_expired: report.pending_payments_expired,
            checkouts_expired: report.checkouts_expired,
        }
    }
}
