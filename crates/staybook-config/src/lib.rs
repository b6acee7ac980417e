//! # Staybook Config
//!
//! Configuration types for the Staybook API.
//!
//! Every structure is loaded from environment variables with sensible
//! development defaults:
//!
//! - [`jwt`]: JWT signing secret and token lifetime
//! - [`cors`]: CORS allowed origins
//! - [`cleanup`]: Booking expiry sweep skip-list and activity logging
//! - [`image`]: Upload image normalization limits
//! - [`media`]: Local media storage location
//! - [`server`]: Bind address
//!
//! # Example
//!
//! ```ignore
//! use staybook_config::{BookingCleanupConfig, ImageProcessingConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cleanup_config = BookingCleanupConfig::from_env();
//! let image_config = ImageProcessingConfig::from_env();
//! ```

pub mod cleanup;
pub mod cors;
pub mod image;
pub mod jwt;
pub mod media;
pub mod server;

mod env;

pub use cleanup::BookingCleanupConfig;
pub use cors::CorsConfig;
pub use image::ImageProcessingConfig;
pub use jwt::JwtConfig;
pub use media::MediaStorageConfig;
pub use server::ServerConfig;
