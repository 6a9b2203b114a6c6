//! # API module
//!
//! JSON endpoints called by the site's pages. Mounted under `/api` by `main`.
//!
//! ## Main modules
//!
//! - [`availability`] - Time slots and operating hours
//! - [`reservation`] - Reservation form submission and table availability
//! - [`newsletter`] - Newsletter signup
//! - [`health`] - Liveness check
//! - [`errors`] - Application error handling

pub mod availability;
pub mod errors;
pub mod health;
pub mod newsletter;
pub mod reservation;
mod middleware;

// Re-export common types for convenience
pub use errors::{AppError, AppResult, ErrorResponse, ResultExt};

use actix_web::web;
use chrono::FixedOffset;
use std::sync::Arc;

use crate::remote::{NewsletterService, ReservationService};

/// Shared by every handler through `web::Data`
///
/// The backends are trait objects so tests can register fakes.
#[derive(Clone)]
pub struct AppState {
    pub reservations: Arc<dyn ReservationService>,
    pub newsletter: Arc<dyn NewsletterService>,
    /// Restaurant timezone, for "today or later"
    pub utc_offset: FixedOffset,
}

/// Registers every API route
///
/// Malformed JSON bodies and query strings are answered with
/// [`AppError::BadRequest`].
///
/// ## Routes
///
/// - `/health` - See [`health::routes`]
/// - `/slots`, `/hours` - See [`availability::routes`]
/// - `/reservations/*` - See [`reservation::routes`]
/// - `/newsletter/*` - See [`newsletter::routes`]
///
/// # Example
///
/// ```no_run
/// use actix_web::{web, App};
/// use cafe_fausse::api;
///
/// let app = App::new()
///     .service(web::scope("/api").configure(api::init_routes));
/// ```
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }));
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }));

    health::routes(cfg);
    availability::routes(cfg);
    reservation::routes(cfg);
    newsletter::routes(cfg);
}
