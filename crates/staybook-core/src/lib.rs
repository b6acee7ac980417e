//! # Staybook Core
//!
//! Foundational types shared by every Staybook crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//!
//! # Example
//!
//! ```ignore
//! use staybook_core::AppError;
//!
//! let error = AppError::unauthorized("Invalid token");
//! ```

pub mod errors;

pub use errors::AppError;
