//! Log output for row diagnostics and the catalog summary.
//!
//! Skipped rows go to the `globetrotter::skipped_invalid` target at `warn`
//! level and processing errors to `globetrotter::processing_error` at
//! `error` level, so each stream can be filtered with `RUST_LOG`.

use globetrotter_catalog_models::{CatalogSummary, RowDiagnostic, RowDiagnosticKind};

/// Log target for rows skipped as invalid.
pub const SKIPPED_INVALID_TARGET: &str = "globetrotter::skipped_invalid";
/// Log target for rows that failed during processing.
pub const PROCESSING_ERROR_TARGET: &str = "globetrotter::processing_error";

/// Log level and target a diagnostic of `kind` is written to.
#[must_use]
pub const fn channel(kind: RowDiagnosticKind) -> (log::Level, &'static str) {
    match kind {
        RowDiagnosticKind::SkippedInvalid => (log::Level::Warn, SKIPPED_INVALID_TARGET),
        RowDiagnosticKind::ProcessingError => (log::Level::Error, PROCESSING_ERROR_TARGET),
    }
}

/// Logs one line per diagnostic on its [`channel`].
pub fn log_diagnostics(diagnostics: &[RowDiagnostic]) {
    for diagnostic in diagnostics {
        let (level, target) = channel(diagnostic.kind);
        log::log!(target: target, level, "{}", format_diagnostic(diagnostic));
    }
}

/// Renders a diagnostic as a single log line.
#[must_use]
pub fn format_diagnostic(diagnostic: &RowDiagnostic) -> String {
    let verb = match diagnostic.kind {
        RowDiagnosticKind::SkippedInvalid => "Skipping invalid row",
        RowDiagnosticKind::ProcessingError => "Error processing row",
    };
    format!(
        "{verb} {}: {} ({})",
        diagnostic.index, diagnostic.row, diagnostic.detail
    )
}

/// Logs the catalog summary.
pub fn log_summary(summary: &CatalogSummary) {
    log::info!(
        "Catalog built: {} cities, {} featured, {} curated images, {} local images",
        summary.total_cities,
        summary.featured_count,
        summary.custom_image_count,
        summary.local_image_count
    );
    if summary.skipped_rows > 0 || summary.processing_errors > 0 {
        log::warn!(
            "{} rows skipped as invalid, {} rows failed processing",
            summary.skipped_rows,
            summary.processing_errors
        );
    }
    for city in &summary.sample {
        log::debug!(
            "Sample city {} #{}: popularity={} cost={} rating={} image={}",
            city.name,
            city.id,
            city.popularity_score,
            city.cost_index,
            city.rating,
            city.image_url
        );
    }
}
