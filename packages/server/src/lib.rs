#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the collision report application.
//!
//! Serves the filter metadata and report generation endpoints consumed
//! by the chart-rendering frontend. The dataset is loaded once before
//! the server binds and shared read-only across all requests; a failed
//! remote fetch falls back to the embedded sample dataset, so startup
//! never fails on data availability.

mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use collision_report_collision_models::Dataset;
use collision_report_metadata::DatasetMetadata;

/// Shared application state.
pub struct AppState {
    /// The collision dataset, loaded once per process.
    pub dataset: &'static Dataset,
    /// Filter choices extracted once from the dataset.
    pub metadata: DatasetMetadata,
}

/// Starts the collision report API server.
///
/// Loads the dataset (or its fallback), extracts the filter metadata,
/// and binds the HTTP server. This is a regular async function — the
/// caller provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Loading collision dataset...");
    let dataset = collision_report_source::load().await;
    log::info!("Loaded {} collision records", dataset.len());

    let metadata = collision_report_metadata::extract(dataset);
    log::info!(
        "Extracted filter metadata: {} boroughs, {} years, {} vehicle types",
        metadata.boroughs.len(),
        metadata.years.len(),
        metadata.vehicle_types.len()
    );

    let state = web::Data::new(AppState { dataset, metadata });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/metadata", web::get().to(handlers::metadata))
                    .route("/report", web::post().to(handlers::report)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
