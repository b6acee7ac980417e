//! # Staybook Models
//!
//! Domain models shared across the Staybook API.
//!
//! - [`roles`]: The closed [`Role`] enumeration
//! - [`users`]: Repository user records and the per-request [`SessionPrincipal`]
//! - [`bookings`]: Booking and payment lifecycle states
//!
//! # Example
//!
//! ```ignore
//! use staybook_models::{Role, SessionPrincipal, UserRecord};
//!
//! let principal = SessionPrincipal::try_from(record)?;
//! if principal.role == Role::ViaAdmin {
//!     // ...
//! }
//! ```

pub mod bookings;
pub mod roles;
pub mod users;

pub use bookings::{BookingStatus, PaymentStatus};
pub use roles::{ParseRoleError, Role};
pub use users::{SessionPrincipal, UserRecord};
