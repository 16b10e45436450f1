//! Catalog configuration.
//!
//! Configuration comes from an optional TOML file named by
//! `GLOBETROTTER_CONFIG`, with individual environment variables layered on
//! top. Everything has a default, so an empty environment builds the
//! catalog from the bundled dataset and image tables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CatalogError;
use crate::builder::CatalogSettings;
use crate::metrics::{DEFAULT_REFERENCE_VISITORS, MetricScale};

/// Country stamped on catalog records by default.
pub const DEFAULT_COUNTRY: &str = "India";

/// Path to a TOML config file.
pub const CONFIG_ENV: &str = "GLOBETROTTER_CONFIG";
/// Overrides [`CatalogConfig::dataset_path`].
pub const DATASET_ENV: &str = "GLOBETROTTER_DATASET";
/// Overrides [`CatalogConfig::image_tables_path`].
pub const IMAGE_TABLES_ENV: &str = "GLOBETROTTER_IMAGE_TABLES";
/// Overrides [`CatalogConfig::reference_visitors`].
pub const REFERENCE_VISITORS_ENV: &str = "GLOBETROTTER_REFERENCE_VISITORS";

/// Settings for building the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Dataset file (`.json` or `.csv`). `None` uses the bundled dataset.
    pub dataset_path: Option<PathBuf>,
    /// Image tables TOML file. `None` uses the bundled tables.
    pub image_tables_path: Option<PathBuf>,
    /// Visitor total that maps to a popularity score of 100.
    pub reference_visitors: f64,
    /// Country stamped on every record.
    pub country: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            image_tables_path: None,
            reference_visitors: DEFAULT_REFERENCE_VISITORS,
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Parses a TOML config document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Toml`] if the document is malformed.
    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        Ok(toml::de::from_str(s)?)
    }

    /// Reads a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        log::info!("Loading config from {}", path.display());
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Builds the config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the config file cannot be loaded or an
    /// override is not parseable.
    pub fn from_env() -> Result<Self, CatalogError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the config file cannot be loaded or an
    /// override is not parseable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CatalogError> {
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(path) = lookup(DATASET_ENV) {
            config.dataset_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup(IMAGE_TABLES_ENV) {
            config.image_tables_path = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup(REFERENCE_VISITORS_ENV) {
            config.reference_visitors =
                value
                    .trim()
                    .parse()
                    .map_err(|e| CatalogError::Config {
                        message: format!("{REFERENCE_VISITORS_ENV}={value:?}: {e}"),
                    })?;
        }

        Ok(config)
    }

    /// Checks values that would make metric derivation meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Config`] if `reference_visitors` is not a
    /// positive finite number or `country` is blank.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !(self.reference_visitors.is_finite() && self.reference_visitors > 0.0) {
            return Err(CatalogError::Config {
                message: format!(
                    "reference_visitors must be a positive finite number, got {}",
                    self.reference_visitors
                ),
            });
        }
        if self.country.trim().is_empty() {
            return Err(CatalogError::Config {
                message: "country must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Build settings derived from this config.
    #[must_use]
    pub fn settings(&self) -> CatalogSettings {
        CatalogSettings {
            country: self.country.clone(),
            scale: MetricScale {
                reference_visitors: self.reference_visitors,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_use_bundled_data() {
        let config = CatalogConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CatalogConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml() {
        let config = CatalogConfig::from_toml_str(
            r#"
            dataset_path = "data/heritage.csv"
            reference_visitors = 3000000.0
            "#,
        )
        .unwrap();
        assert_eq!(config.dataset_path, Some(PathBuf::from("data/heritage.csv")));
        assert!(config.image_tables_path.is_none());
        assert!((config.reference_visitors - 3_000_000.0).abs() < f64::EPSILON);
        assert_eq!(config.country, DEFAULT_COUNTRY);
    }

    #[test]
    fn env_overrides_apply() {
        let config = CatalogConfig::from_lookup(lookup(&[
            (DATASET_ENV, "/srv/heritage.json"),
            (IMAGE_TABLES_ENV, "/srv/images.toml"),
            (REFERENCE_VISITORS_ENV, " 2500000 "),
        ]))
        .unwrap();
        assert_eq!(config.dataset_path, Some(PathBuf::from("/srv/heritage.json")));
        assert_eq!(
            config.image_tables_path,
            Some(PathBuf::from("/srv/images.toml"))
        );
        assert!((config.reference_visitors - 2_500_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unparseable_override_is_an_error() {
        let err = CatalogConfig::from_lookup(lookup(&[(REFERENCE_VISITORS_ENV, "lots")]))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Config { .. }));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = CatalogConfig::from_lookup(lookup(&[(CONFIG_ENV, "/nonexistent/gt.toml")]))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn validate_rejects_bad_reference_counts() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = CatalogConfig {
                reference_visitors: bad,
                ..CatalogConfig::default()
            };
            assert!(config.validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn validate_rejects_blank_country() {
        let config = CatalogConfig {
            country: "  ".to_string(),
            ..CatalogConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn settings_carry_scale_and_country() {
        let config = CatalogConfig {
            reference_visitors: 10.0,
            country: "Nepal".to_string(),
            ..CatalogConfig::default()
        };
        let settings = config.settings();
        assert_eq!(settings.country, "Nepal");
        assert!((settings.scale.reference_visitors - 10.0).abs() < f64::EPSILON);
    }
}
