//! Image uploads for hotels and customer avatars.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
