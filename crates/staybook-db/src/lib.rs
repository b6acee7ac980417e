//! # Staybook DB
//!
//! Persistence boundary for the Staybook API.
//!
//! - [`repositories`]: Repository traits consumed by the request pipeline
//! - [`postgres`]: PostgreSQL implementations of those traits
//! - [`expiry`]: The booking expiry sweep built on [`BookingRepository`]
//!
//! # Example
//!
//! ```ignore
//! use staybook_db::{init_db_pool, run_migrations, PgBookingRepository, run_expiry_sweep};
//!
//! let pool = init_db_pool().await;
//! run_migrations(&pool).await?;
//!
//! let bookings = PgBookingRepository::new(pool.clone());
//! let report = run_expiry_sweep(&bookings).await?;
//! println!("expired {} bookings", report.total());
//! ```

pub mod expiry;
pub mod postgres;
pub mod repositories;

use std::env;

use sqlx::postgres::PgPoolOptions;

pub use expiry::{SweepError, SweepReport, run_expiry_sweep};
pub use postgres::{PgAuthenticationRepository, PgBookingRepository};
pub use repositories::{AuthenticationRepository, BookingRepository};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Initializes a PostgreSQL connection pool from `DATABASE_URL`.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the database is unreachable; this
/// is only called during process startup.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    connect_pool(&database_url)
        .await
        .expect("Failed to connect to database")
}

pub async fn connect_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
    MIGRATOR.run(pool).await
}
