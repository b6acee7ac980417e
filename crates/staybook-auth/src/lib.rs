//! # Staybook Auth
//!
//! JWT claims and token utilities for the Staybook API.
//!
//! Access tokens are HS256-signed and carry the user's email as the subject.
//! The request pipeline verifies the signature and expiry here, then resolves
//! the subject to a user record through the authentication repository.
//!
//! # Example
//!
//! ```ignore
//! use staybook_auth::{create_access_token, verify_token};
//! use staybook_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token("guest@example.com", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.sub, "guest@example.com");
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
