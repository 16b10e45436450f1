#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Heritage dataset rows, circle aggregates, and city catalog record types.
//!
//! The heritage dataset reports domestic visitor counts per monument,
//! grouped into administrative "circles". Each circle becomes one
//! [`CityRecord`] in the catalog.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Circle name the dataset uses for its grand-total row.
pub const TOTAL_ROW_MARKER: &str = "Total";

/// One row of the heritage dataset, exactly as loaded.
///
/// Logically a `(circle, monument, domestic_visitors)` triple, but kept as
/// raw JSON so malformed rows can be reported verbatim instead of failing
/// the load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(pub serde_json::Value);

impl RawRow {
    /// Creates a row from its cells.
    #[must_use]
    pub const fn new(cells: Vec<serde_json::Value>) -> Self {
        Self(serde_json::Value::Array(cells))
    }

    /// Returns the row's cells, or `None` if the row is not an array.
    #[must_use]
    pub fn cells(&self) -> Option<&[serde_json::Value]> {
        self.0.as_array().map(Vec::as_slice)
    }
}

impl std::fmt::Display for RawRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// All monuments and visitors of a single circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleAggregate {
    /// Circle name, used as the city name.
    pub name: String,
    /// Monument names in dataset order (duplicates kept).
    pub monuments: Vec<String>,
    /// Sum of domestic visitors across all of the circle's rows.
    pub domestic_visitors_total: f64,
}

impl CircleAggregate {
    /// Creates an empty aggregate for `name`.
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            name,
            monuments: Vec::new(),
            domestic_visitors_total: 0.0,
        }
    }

    /// Adds one monument row to this circle.
    pub fn push(&mut self, monument: String, domestic_visitors: f64) {
        self.monuments.push(monument);
        self.domestic_visitors_total += domestic_visitors;
    }
}

/// Metrics derived from a circle's visitor total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityMetrics {
    /// Relative visitor traffic, 0-100.
    pub popularity_score: u8,
    /// Relative cost proxy; 80 at zero traffic.
    pub cost_index: u32,
    /// Star rating between 3.5 and 5.0, one decimal place.
    pub rating: f64,
}

/// A city in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRecord {
    /// 1-based id in first-seen dataset order. Not stable across datasets.
    pub id: u32,
    /// Circle name.
    pub name: String,
    /// Country all dataset circles belong to.
    pub country: String,
    /// Relative visitor traffic, 0-100.
    pub popularity_score: u8,
    /// Relative cost proxy.
    pub cost_index: u32,
    /// Star rating between 3.5 and 5.0.
    pub rating: f64,
    /// Up to three monument names, with `...` when more exist.
    pub description: String,
    /// Visitor total in millions, e.g. `"1.5M"`.
    pub travelers_label: String,
    /// Resolved cover image URL.
    pub image_url: String,
    /// Set only on featured copies.
    #[serde(default)]
    pub is_new: bool,
}

/// Which diagnostic channel a rejected row went to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RowDiagnosticKind {
    /// Empty circle or monument, or a visitor count that is not a number.
    SkippedInvalid,
    /// Structurally broken row (not an array, or a non-scalar cell).
    ProcessingError,
}

/// A dataset row that did not reach any aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDiagnostic {
    /// Zero-based index of the row in the dataset.
    pub index: usize,
    /// Diagnostic channel.
    pub kind: RowDiagnosticKind,
    /// The row as JSON text.
    pub row: String,
    /// What was wrong with it.
    pub detail: String,
}

/// Summary report of a built catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    /// Number of cities in the catalog.
    pub total_cities: usize,
    /// Number of featured cities.
    pub featured_count: usize,
    /// Catalog cities with a curated image entry.
    pub custom_image_count: usize,
    /// Catalog cities that use a bundled local asset.
    pub local_image_count: usize,
    /// The first few catalog records.
    pub sample: Vec<CityRecord>,
    /// Rows dropped as invalid.
    pub skipped_rows: usize,
    /// Rows dropped due to processing errors.
    pub processing_errors: usize,
    /// Grand-total rows excluded from aggregation.
    pub excluded_totals: usize,
}
