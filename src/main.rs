//! # Café Fausse Server
//!
//! Web server for the Café Fausse site, built with Rust and Actix Web.
//!
//! ## Main features
//!
//! - **Static site**: Home, Menu, About, Gallery and Reservations pages
//! - **Time slots**: bookable times computed from the operating hours
//! - **Reservations**: validated locally, then forwarded to the reservation backend
//! - **Newsletter**: signup forwarded to the same backend
//!
//! ## Configuration
//!
//! Environment variables (or a `.env` file), see [`cafe_fausse::config`]:
//!
//! ```env
//! BIND_ADDRESS=0.0.0.0:8080
//! STATIC_DIR=./static
//! BACKEND_URL=http://localhost:5000/api
//! BACKEND_TIMEOUT_SECS=30
//! RESTAURANT_UTC_OFFSET=-05:00
//! RUST_LOG=debug,actix_web=info
//! ```
//!
//! ## Running
//!
//! ```bash
//! # 1. Start the reservation backend (listens on :5000 by default)
//!
//! # 2. Configure
//! cp .env.example .env
//!
//! # 3. Build and run
//! cargo run
//!
//! # 4. Open http://localhost:8080
//! ```

use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;

use cafe_fausse::api::{self, AppState};
use cafe_fausse::config::Settings;
use cafe_fausse::remote::HttpBackend;

/// Starts the web server
///
/// 1. Loads `.env`
/// 2. Sets up tracing
/// 3. Reads [`Settings`]
/// 4. Builds the HTTP client for the reservation backend
/// 5. Serves `/api/*`, the static files under `/static`, and redirects `/`
///
/// # Errors
///
/// Returns `std::io::Error` if the configuration is invalid, the HTTP client
/// cannot be built, or the address cannot be bound.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cafe_fausse=debug".parse().expect("static directive"))
                .add_directive("actix_web=info".parse().expect("static directive"))
                .add_directive("reqwest=info".parse().expect("static directive")),
        )
        .init();

    tracing::info!("Starting Café Fausse server...");

    let settings = Settings::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let backend = HttpBackend::new(&settings.backend_url, settings.backend_timeout).map_err(|e| {
        tracing::error!(error = %e, "Could not build the reservation backend client");
        std::io::Error::new(std::io::ErrorKind::Other, format!("HTTP client error: {}", e))
    })?;
    let backend = Arc::new(backend);

    tracing::info!(
        backend_url = %settings.backend_url,
        timeout_secs = settings.backend_timeout.as_secs(),
        utc_offset = %settings.utc_offset,
        "Reservation backend configured"
    );

    let state = AppState {
        reservations: backend.clone(),
        newsletter: backend,
        utc_offset: settings.utc_offset,
    };

    let static_dir = settings.static_dir.clone();
    tracing::info!(bind_address = %settings.bind_address, static_dir = %static_dir, "Server listening");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .service(web::scope("/api").configure(api::init_routes))
            .service(Files::new("/static", &static_dir).index_file("index.html"))
            .route(
                "/",
                web::get().to(|| async {
                    actix_web::HttpResponse::PermanentRedirect()
                        .append_header(("Location", "/static/index.html"))
                        .finish()
                }),
            )
    })
    .bind(&settings.bind_address)?
    .run()
    .await
}
