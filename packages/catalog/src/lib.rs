#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Heritage dataset aggregation, city metrics, and catalog building.
//!
//! The pipeline runs once, synchronously, when the host application calls
//! [`init_catalog`]:
//!
//! ```text
//! Dataset -> aggregate -> derive metrics -> resolve images -> Catalog
//! ```
//!
//! Row-level problems never abort the build. They are collected as
//! [`RowDiagnostic`](globetrotter_catalog_models::RowDiagnostic)s on the
//! [`Aggregation`](aggregate::Aggregation) and logged by
//! [`report::log_diagnostics`].

pub mod aggregate;
pub mod builder;
pub mod config;
pub mod dataset;
pub mod metrics;
pub mod report;

use globetrotter_images::{ImageResolver, ImageTables, ImageTablesError};

pub use aggregate::{Aggregation, aggregate};
pub use builder::Catalog;
pub use config::CatalogConfig;
pub use dataset::Dataset;

/// Errors that can occur while loading the dataset or configuration.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing failed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid configuration value or unsupported input.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// Image tables could not be loaded.
    #[error("Image tables error: {0}")]
    Images(#[from] ImageTablesError),
}

/// Everything the host application needs after initialization.
#[derive(Debug)]
pub struct CatalogBuild {
    /// The built catalog.
    pub catalog: Catalog,
    /// Resolver over the image tables the catalog was built with.
    pub resolver: ImageResolver,
    /// Aggregation result, including row diagnostics.
    pub aggregation: Aggregation,
}

/// Loads the configured image tables, falling back to the bundled ones.
///
/// # Errors
///
/// Returns [`CatalogError::Images`] if a configured table file cannot be
/// read or parsed.
pub fn load_image_tables(config: &CatalogConfig) -> Result<ImageTables, CatalogError> {
    Ok(match &config.image_tables_path {
        Some(path) => ImageTables::load(path)?,
        None => ImageTables::bundled(),
    })
}

/// Builds the catalog from the configured dataset and image tables.
///
/// This is the single explicit initialization step; the returned value is
/// owned by the caller and passed to consumers.
///
/// # Errors
///
/// Returns [`CatalogError`] if the configuration is invalid or the dataset
/// or image tables cannot be loaded. Malformed rows are not errors.
pub fn init_catalog(config: &CatalogConfig) -> Result<CatalogBuild, CatalogError> {
    config.validate()?;

    let dataset = match &config.dataset_path {
        Some(path) => Dataset::load(path)?,
        None => Dataset::bundled()?,
    };
    log::info!("Loaded {} dataset rows", dataset.len());

    let resolver = ImageResolver::new(load_image_tables(config)?);

    let aggregation = aggregate(dataset.rows());
    report::log_diagnostics(&aggregation.diagnostics);
    log::info!(
        "Aggregated {} circles ({} rows skipped, {} total rows excluded)",
        aggregation.circles.len(),
        aggregation.diagnostics.len(),
        aggregation.excluded_totals
    );

    let catalog = Catalog::build(&aggregation.circles, &resolver, &config.settings());
    report::log_summary(&catalog.summary(&resolver, &aggregation));

    Ok(CatalogBuild {
        catalog,
        resolver,
        aggregation,
    })
}
