#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the GlobeTrotter city catalog.
//!
//! The catalog is built once at startup by
//! [`init_catalog`](globetrotter_catalog::init_catalog) and held in
//! [`AppState`]. The only mutation is an image refresh, which swaps the
//! resolver's tables and rewrites each record's image url.

mod handlers;

use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use globetrotter_catalog::aggregate::Aggregation;
use globetrotter_catalog::{Catalog, CatalogBuild, CatalogConfig, CatalogError, init_catalog};
use globetrotter_images::ImageResolver;

/// Shared application state.
///
/// Lock order is `resolver` before `catalog` wherever both are held.
#[derive(Debug)]
pub struct AppState {
    /// Config the catalog was built with. Refresh reloads image tables
    /// from `image_tables_path` when it is set.
    pub config: CatalogConfig,
    /// The city catalog.
    pub catalog: RwLock<Catalog>,
    /// Resolver over the current image tables.
    pub resolver: RwLock<ImageResolver>,
    /// Aggregation the catalog was built from, for the summary endpoint.
    pub aggregation: Aggregation,
}

impl AppState {
    /// Wraps an already-built catalog.
    #[must_use]
    pub fn new(config: CatalogConfig, build: CatalogBuild) -> Self {
        Self {
            config,
            catalog: RwLock::new(build.catalog),
            resolver: RwLock::new(build.resolver),
            aggregation: build.aggregation,
        }
    }

    /// Builds the catalog from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the catalog cannot be initialized.
    pub fn init(config: CatalogConfig) -> Result<Self, CatalogError> {
        let build = init_catalog(&config)?;
        Ok(Self::new(config, build))
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/cities", web::get().to(handlers::cities))
            .route("/cities/featured", web::get().to(handlers::featured))
            .route("/cities/{id}", web::get().to(handlers::city))
            .route("/catalog/summary", web::get().to(handlers::summary))
            .route("/images/resolve", web::get().to(handlers::resolve_image))
            .route("/images/fallback", web::get().to(handlers::fallback_image))
            .route("/images/refresh", web::post().to(handlers::refresh_images)),
    );
}

/// Starts the GlobeTrotter API server.
///
/// Binds to `BIND_ADDR` (default `127.0.0.1`) and `PORT` (default `8080`).
/// The caller provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
pub async fn run_server(state: AppState) -> std::io::Result<()> {
    let state = web::Data::new(state);

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
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
