//! City catalog construction.
//!
//! Records are built in first-seen circle order (which fixes their ids)
//! and then stably sorted by descending popularity.

use globetrotter_catalog_models::{CatalogSummary, CircleAggregate, CityRecord};
use globetrotter_images::ImageResolver;
use indexmap::IndexMap;
use serde::Serialize;

use crate::aggregate::Aggregation;
use crate::metrics::{self, MetricScale};

/// Number of cities in the featured slice.
pub const FEATURED_COUNT: usize = 3;

/// Number of records included in a [`CatalogSummary`] sample.
pub const SUMMARY_SAMPLE_SIZE: usize = 3;

const DESCRIPTION_MONUMENTS: usize = 3;
const DESCRIPTION_SEPARATOR: &str = ", ";
const TRUNCATION_MARKER: &str = "...";

/// Per-build settings that are not part of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSettings {
    /// Country stamped on every record.
    pub country: String,
    /// Metric normalization.
    pub scale: MetricScale,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            country: crate::config::DEFAULT_COUNTRY.to_string(),
            scale: MetricScale::default(),
        }
    }
}

/// The ranked city catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<CityRecord>,
}

impl Catalog {
    /// Builds the catalog from aggregated circles.
    #[must_use]
    pub fn build(
        circles: &IndexMap<String, CircleAggregate>,
        resolver: &ImageResolver,
        settings: &CatalogSettings,
    ) -> Self {
        let mut records: Vec<CityRecord> = circles
            .values()
            .zip(1u32..)
            .map(|(circle, id)| build_record(id, circle, resolver, settings))
            .collect();

        // `sort_by` is stable: equal scores keep build order.
        records.sort_by(|a, b| b.popularity_score.cmp(&a.popularity_score));

        log::debug!("Built catalog with {} cities", records.len());

        Self { records }
    }

    /// All records, most popular first.
    #[must_use]
    pub fn records(&self) -> &[CityRecord] {
        &self.records
    }

    /// The top [`FEATURED_COUNT`] records, copied with `is_new` set.
    #[must_use]
    pub fn featured(&self) -> Vec<CityRecord> {
        self.records
            .iter()
            .take(FEATURED_COUNT)
            .map(|record| CityRecord {
                is_new: true,
                ..record.clone()
            })
            .collect()
    }

    /// Re-resolves every record's image URL in place. Nothing else changes.
    ///
    /// Returns how many URLs changed.
    pub fn refresh(&mut self, resolver: &ImageResolver) -> usize {
        let mut changed = 0;
        for record in &mut self.records {
            let url = resolver.resolve(&record.name);
            if url != record.image_url {
                log::debug!("{}: image {} -> {url}", record.name, record.image_url);
                record.image_url = url;
                changed += 1;
            }
        }
        log::info!(
            "Refreshed images for {} cities ({changed} changed)",
            self.records.len()
        );
        changed
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&CityRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Looks up a record by exact city name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&CityRecord> {
        self.records.iter().find(|record| record.name == name)
    }

    /// Number of cities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no cities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Summary report for diagnostics output.
    #[must_use]
    pub fn summary(&self, resolver: &ImageResolver, aggregation: &Aggregation) -> CatalogSummary {
        let tables = resolver.tables();
        CatalogSummary {
            total_cities: self.records.len(),
            featured_count: self.records.len().min(FEATURED_COUNT),
            custom_image_count: self
                .records
                .iter()
                .filter(|record| tables.curated(&record.name).is_some())
                .count(),
            local_image_count: self
                .records
                .iter()
                .filter(|record| tables.is_local_asset(&record.name))
                .count(),
            sample: self
                .records
                .iter()
                .take(SUMMARY_SAMPLE_SIZE)
                .cloned()
                .collect(),
            skipped_rows: aggregation.skipped_count(),
            processing_errors: aggregation.error_count(),
            excluded_totals: aggregation.excluded_totals,
        }
    }
}

fn build_record(
    id: u32,
    circle: &CircleAggregate,
    resolver: &ImageResolver,
    settings: &CatalogSettings,
) -> CityRecord {
    let metrics = metrics::derive(circle.domestic_visitors_total, &settings.scale);

    CityRecord {
        id,
        name: circle.name.clone(),
        country: settings.country.clone(),
        popularity_score: metrics.popularity_score,
        cost_index: metrics.cost_index,
        rating: metrics.rating,
        description: describe(&circle.monuments),
        travelers_label: travelers_label(circle.domestic_visitors_total),
        image_url: resolver.resolve(&circle.name),
        is_new: false,
    }
}

/// First three monuments joined with `", "`, plus `"..."` if there are more.
fn describe(monuments: &[String]) -> String {
    let mut description = monuments
        .iter()
        .take(DESCRIPTION_MONUMENTS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(DESCRIPTION_SEPARATOR);
    if monuments.len() > DESCRIPTION_MONUMENTS {
        description.push_str(TRUNCATION_MARKER);
    }
    description
}

/// Visitor total in millions with one decimal, halves rounded up.
fn travelers_label(domestic_visitors_total: f64) -> String {
    let tenths = (domestic_visitors_total / 100_000.0).round();
    format!("{:.1}M", tenths / 10.0)
}
