//! # Café Fausse
//!
//! Website server for the Café Fausse restaurant: the static pages plus the
//! logic behind the two forms (table reservation and newsletter signup).
//!
//! ## Modules
//!
//! - [`availability`] - Bookable half-hour slots from the weekly operating hours
//! - [`reservation`] - Reservation draft, validation and submission state machine
//! - [`newsletter`] - Newsletter signup form
//! - [`remote`] - Client for the reservation backend (opaque remote service)
//! - [`api`] - Actix Web JSON endpoints used by the pages
//! - [`config`] - Environment configuration
//!
//! ## Architecture
//!
//! ```text
//! Pages (HTML/CSS/JS)
//!     ↓ HTTP/JSON
//! API (Actix Web)  →  availability / reservation / newsletter
//!     ↓ reqwest
//! Reservation backend (stores reservations, assigns tables)
//! ```

pub mod api;
pub mod availability;
pub mod config;
pub mod newsletter;
pub mod remote;
pub mod reservation;
