pub mod account;
pub mod bookings;
pub mod media;
