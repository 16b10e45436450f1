//! Raw heritage dataset loading.
//!
//! The bundled dataset is embedded at compile time via [`include_str!`].
//! Its shape is `{ "data": [[circle, monument, domestic19], ...] }`.
//! Replacement datasets can be loaded from JSON files of the same shape
//! or from CSV files with a `circle,monument,domestic19` header.
//!
//! Loading only fails on structural problems. Individual rows are never
//! validated here; that is the aggregator's job.

use std::io::Read;
use std::path::Path;

use globetrotter_catalog_models::RawRow;
use serde::Deserialize;

use crate::CatalogError;

/// Heritage dataset embedded at compile time.
const BUNDLED_DATASET: &str = include_str!("../data/heritage_sites.json");

/// The raw dataset rows in file order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Dataset {
    data: Vec<RawRow>,
}

impl Dataset {
    /// Wraps already-loaded rows.
    #[must_use]
    pub const fn from_rows(rows: Vec<RawRow>) -> Self {
        Self { data: rows }
    }

    /// Parses the dataset bundled with the binary.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] if the embedded document is malformed.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_DATASET)
    }

    /// Parses a `{ "data": [...] }` JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] if the document does not have that
    /// shape.
    pub fn from_json_str(s: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parses CSV with a header row. Every field becomes a string cell;
    /// rows may have any number of fields.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Csv`] on I/O or CSV framing errors.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut data = Vec::new();
        for record in rdr.records() {
            let record = record?;
            data.push(RawRow::new(
                record
                    .iter()
                    .map(|field| serde_json::Value::String(field.to_string()))
                    .collect(),
            ));
        }

        Ok(Self { data })
    }

    /// Loads a dataset file, choosing the parser by extension (`.json` or
    /// `.csv`).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the file cannot be read or parsed, or has
    /// an unsupported extension.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        log::info!("Loading dataset from {}", path.display());

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?),
            Some("csv") => Self::from_csv_reader(std::fs::File::open(path)?),
            _ => Err(CatalogError::Config {
                message: format!(
                    "unsupported dataset format for {} (expected .json or .csv)",
                    path.display()
                ),
            }),
        }
    }

    /// The rows in file order.
    #[must_use]
    pub fn rows(&self) -> &[RawRow] {
        &self.data
    }

    /// Number of rows, including ones that will later be rejected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::aggregate;

    #[test]
    fn parses_bundled_dataset() {
        let dataset = Dataset::bundled().unwrap();
        assert_eq!(dataset.len(), 35);
        assert_eq!(
            dataset.rows()[0],
            RawRow::new(vec![json!("Agra"), json!("Taj Mahal"), json!(4_490_000)])
        );
    }

    #[test]
    fn json_without_data_is_rejected() {
        let err = Dataset::from_json_str(r#"{"rows": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn json_rows_are_kept_verbatim() {
        let dataset = Dataset::from_json_str(r#"{"data": [["Agra"], 42, {"x": 1}]}"#).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.rows()[1], RawRow(json!(42)));
    }

    #[test]
    fn csv_produces_string_cells() {
        let csv = "circle,monument,domestic19\nAgra,Taj Mahal,1000000\nDelhi,,12\n";
        let dataset = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.rows()[0],
            RawRow::new(vec![json!("Agra"), json!("Taj Mahal"), json!("1000000")])
        );
    }

    #[test]
    fn csv_allows_short_rows() {
        let csv = "circle,monument,domestic19\nAgra,Taj Mahal\n";
        let dataset = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.rows()[0].cells().map(<[_]>::len), Some(2));
    }

    #[test]
    fn csv_and_json_aggregate_identically() {
        let csv = "circle,monument,domestic19\n\
                   Agra,Taj Mahal,1000000\n\
                   Agra,Agra Fort,500000\n\
                   Total,,1500000\n";
        let json = r#"{"data": [
            ["Agra", "Taj Mahal", 1000000],
            ["Agra", "Agra Fort", 500000],
            ["Total", "", 1500000]
        ]}"#;

        let from_csv = aggregate(Dataset::from_csv_reader(csv.as_bytes()).unwrap().rows());
        let from_json = aggregate(Dataset::from_json_str(json).unwrap().rows());
        assert_eq!(from_csv.circles, from_json.circles);
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let err = Dataset::load(Path::new("heritage.xlsx")).unwrap_err();
        assert!(matches!(err, CatalogError::Config { .. }));
    }

    #[test]
    fn load_reads_json_file() {
        let path = std::env::temp_dir().join(format!(
            "globetrotter_dataset_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"data": [["Goa", "Se Cathedral", 10]]}"#).unwrap();
        let dataset = Dataset::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(dataset.len(), 1);
    }
}
