//! Role gate.
//!
//! Every policy is a total function over `Option<Role>`. An absent principal
//! never satisfies a permissive policy ("only" / "or") but does satisfy the
//! exclusion policies, which only reject the named role.
//!
//! Gates read the principal attached by the token verifier, so they must be
//! layered inside [`crate::middleware::auth::authenticate`]:
//!
//! ```rust,ignore
//! use axum::{Router, middleware};
//! use crate::middleware::{auth::authenticate, role::require_via_admin};
//!
//! let admin_routes = Router::new()
//!     .route("/expire", post(handler))
//!     .route_layer(middleware::from_fn(require_via_admin))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));
//! ```

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use staybook_core::AppError;
use staybook_models::{Role, SessionPrincipal};

use crate::metrics::track_authorization_check;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccessPolicy {
    CustomerOnly,
    CustomerExcluded,
    HotelManagerOnly,
    HotelManagerExcluded,
    ViaAdminOnly,
    HotelManagerOrViaAdmin,
}

impl AccessPolicy {
    pub const ALL: [AccessPolicy; 6] = [
        AccessPolicy::CustomerOnly,
        AccessPolicy::CustomerExcluded,
        AccessPolicy::HotelManagerOnly,
        AccessPolicy::HotelManagerExcluded,
        AccessPolicy::ViaAdminOnly,
        AccessPolicy::HotelManagerOrViaAdmin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AccessPolicy::CustomerOnly => "customer_only",
            AccessPolicy::CustomerExcluded => "customer_excluded",
            AccessPolicy::HotelManagerOnly => "hotel_manager_only",
            AccessPolicy::HotelManagerExcluded => "hotel_manager_excluded",
            AccessPolicy::ViaAdminOnly => "via_admin_only",
            AccessPolicy::HotelManagerOrViaAdmin => "hotel_manager_or_via_admin",
        }
    }

    pub fn permits(&self, role: Option<Role>) -> bool {
        match self {
            AccessPolicy::CustomerOnly => role == Some(Role::Customer),
            AccessPolicy::CustomerExcluded => role != Some(Role::Customer),
            AccessPolicy::HotelManagerOnly => role == Some(Role::HotelManager),
            AccessPolicy::HotelManagerExcluded => role != Some(Role::HotelManager),
            AccessPolicy::ViaAdminOnly => role == Some(Role::ViaAdmin),
            AccessPolicy::HotelManagerOrViaAdmin => {
                matches!(role, Some(Role::HotelManager | Role::ViaAdmin))
            }
        }
    }

    pub fn denial_message(&self) -> &'static str {
        match self {
            AccessPolicy::CustomerOnly => "Access denied. Customers only",
            AccessPolicy::CustomerExcluded => "Access denied. Not available to customers",
            AccessPolicy::HotelManagerOnly => "Access denied. Hotel managers only",
            AccessPolicy::HotelManagerExcluded => {
                "Access denied. Not available to hotel managers"
            }
            AccessPolicy::ViaAdminOnly => "Access denied. Via admins only",
            AccessPolicy::HotelManagerOrViaAdmin => {
                "Access denied. Hotel managers or via admins only"
            }
        }
    }

    /// Allow or deny `principal` under this policy.
    pub fn check(&self, principal: Option<&SessionPrincipal>) -> Result<(), AppError> {
        let role = principal.map(|p| p.role);
        let allowed = self.permits(role);
        track_authorization_check(self.name(), allowed);

        if allowed {
            Ok(())
        } else {
            debug!(policy = self.name(), role = ?role, "Role gate denied request");
            Err(AppError::unauthorized(self.denial_message()))
        }
    }
}

/// Run `policy` against the principal in the request extensions.
pub async fn enforce(policy: AccessPolicy, req: Request, next: Next) -> Response {
    match policy.check(req.extensions().get::<SessionPrincipal>()) {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

pub async fn require_customer(req: Request, next: Next) -> Response {
    enforce(AccessPolicy::CustomerOnly, req, next).await
}

pub async fn deny_customer(req: Request, next: Next) -> Response {
    enforce(AccessPolicy::CustomerExcluded, req, next).await
}

pub async fn require_hotel_manager(req: Request, next: Next) -> Response {
    enforce(AccessPolicy::HotelManagerOnly, req, next).await
}

pub async fn deny_hotel_manager(req: Request, next: Next) -> Response {
    enforce(AccessPolicy::HotelManagerExcluded, req, next).await
}

pub async fn require_via_admin(req: Request, next: Next) -> Response {
    enforce(AccessPolicy::ViaAdminOnly, req, next).await
}

pub async fn require_hotel_manager_or_via_admin(req: Request, next: Next) -> Response {
    enforce(AccessPolicy::HotelManagerOrViaAdmin, req, next).await
}
