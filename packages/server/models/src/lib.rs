#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the GlobeTrotter server.
//!
//! City records are served as-is from the catalog; the types here wrap
//! them with pagination and image resolution details.

use globetrotter_catalog_models::CityRecord;
use globetrotter_images_models::{ImageSource, ResolvedImage};
use serde::{Deserialize, Serialize};

/// Default page size for the cities endpoint.
pub const DEFAULT_CITY_LIMIT: usize = 50;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters for the cities endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityQueryParams {
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Offset for pagination.
    pub offset: Option<usize>,
}

/// A page of catalog records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCityPage {
    /// Records in catalog order.
    pub cities: Vec<CityRecord>,
    /// Total number of records in the catalog.
    pub total_count: usize,
    /// Whether more records exist beyond this page.
    pub has_more: bool,
}

/// Query parameters for the image resolve endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResolveParams {
    /// City name.
    pub city: String,
}

/// Query parameters for the image fallback endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFallbackParams {
    /// City name.
    pub city: String,
    /// Source that already failed to load.
    #[serde(default)]
    pub tried: String,
}

/// An image resolution result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiImageResolution {
    /// City the image was resolved for.
    pub city: String,
    /// Resolved image url or path.
    pub url: String,
    /// Which table produced the url.
    pub source: ImageSource,
}

impl ApiImageResolution {
    /// Pairs a resolution with the city it was requested for.
    #[must_use]
    pub fn new(city: impl Into<String>, resolved: ResolvedImage) -> Self {
        Self {
            city: city.into(),
            url: resolved.url,
            source: resolved.source,
        }
    }
}

/// Response from the image refresh endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRefreshResult {
    /// Number of records whose image url changed.
    pub updated: usize,
    /// Number of records in the catalog.
    pub total_count: usize,
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
