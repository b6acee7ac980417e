//! Middleware and extractors making up the request pipeline.
//!
//! # Modules
//!
//! - [`auth`]: Token verifier and the [`auth::CurrentUser`] extractor
//! - [`role`]: Role gate policies
//! - [`booking_cleanup`]: Request-piggybacked booking expiry
//! - [`image`]: Multipart upload extractors that normalize images
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>` or the `access_token` cookie
//! 2. [`auth::authenticate`] verifies the JWT and resolves the subject to a user
//! 3. The resulting `SessionPrincipal` is stored in the request extensions
//! 4. A role gate (e.g. [`role::require_via_admin`]) checks the principal's role
//! 5. Handler executes, reading the principal through `CurrentUser`
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::post};
//! use crate::middleware::{auth::authenticate, role::require_via_admin};
//!
//! let admin_routes = Router::new()
//!     .route("/expire", post(expire_stale_bookings))
//!     .route_layer(middleware::from_fn(require_via_admin))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));
//! ```

pub mod auth;
pub mod booking_cleanup;
pub mod image;
pub mod role;
