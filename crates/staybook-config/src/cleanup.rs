//! Booking expiry sweep configuration.
//!
//! The sweep piggybacks on incoming requests. Operational endpoints that are
//! polled frequently (health checks, scrapers, browsers fetching favicons) are
//! skipped so they never touch the database.
//!
//! # Environment Variables
//!
//! - `BOOKING_CLEANUP_SKIP_ROUTES`: comma separated path prefixes
//!   (default: `/health,/status,/metrics,/favicon.ico,/robots.txt`)
//! - `BOOKING_CLEANUP_LOG_ACTIVITY`: log an activity line when records were
//!   expired (default: `false`)

use std::env;

use crate::env::flag_or;

pub const DEFAULT_SKIP_ROUTES: [&str; 5] =
    ["/health", "/status", "/metrics", "/favicon.ico", "/robots.txt"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingCleanupConfig {
    pub skip_routes: Vec<String>,
    pub log_activity: bool,
}

impl Default for BookingCleanupConfig {
    fn default() -> Self {
        Self {
            skip_routes: DEFAULT_SKIP_ROUTES.iter().map(|r| r.to_string()).collect(),
            log_activity: false,
        }
    }
}

impl BookingCleanupConfig {
    pub fn from_env() -> Self {
        let skip_routes = env::var("BOOKING_CLEANUP_SKIP_ROUTES")
            .map(|raw| parse_skip_routes(&raw))
            .unwrap_or_else(|_| Self::default().skip_routes);

        Self {
            skip_routes,
            log_activity: flag_or("BOOKING_CLEANUP_LOG_ACTIVITY", false),
        }
    }

    pub fn with_log_activity(mut self, log_activity: bool) -> Self {
        self.log_activity = log_activity;
        self
    }

    /// Whether `path` is covered by the skip-list.
    ///
    /// A route matches the exact path and anything below it on a segment
    /// boundary, so `/health` covers `/health/live` but not `/healthcheck`.
    pub fn should_skip(&self, path: &str) -> bool {
        self.skip_routes.iter().any(|route| {
            let route = route.trim_end_matches('/');
            match path.strip_prefix(route) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            }
        })
    }
}

fn parse_skip_routes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with('/') {
                s.to_string()
            } else {
                format!("/{}", s)
            }
        })
        .collect()
}
