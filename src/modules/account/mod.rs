//! The authenticated caller's own identity and access.

pub mod controller;
pub mod model;
pub mod router;
