#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! GlobeTrotter API server binary.

use globetrotter_catalog::CatalogConfig;
use globetrotter_server::{AppState, run_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Building city catalog...");
    let state = CatalogConfig::from_env()
        .and_then(AppState::init)
        .map_err(std::io::Error::other)?;

    run_server(state).await
}
