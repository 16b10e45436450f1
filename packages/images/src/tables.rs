//! Immutable image lookup tables.
//!
//! The bundled tables live in `packages/images/sources/image_tables.toml`
//! and are baked into the binary with [`include_str!`]. Hosts can load a
//! replacement file at runtime and swap it into an
//! [`ImageResolver`](crate::ImageResolver).

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use globetrotter_images_models::{ImageSourceEntry, ImageTablesDef};

use crate::ImageTablesError;

/// Image tables embedded at compile time.
const BUNDLED_TABLES: &str = include_str!("../sources/image_tables.toml");

/// Number of cities in the bundled local-asset set. Enforced by a test.
#[cfg(test)]
const EXPECTED_LOCAL_ASSET_COUNT: usize = 5;

/// Number of cities in the bundled curated table. Enforced by a test.
#[cfg(test)]
const EXPECTED_CURATED_COUNT: usize = 8;

/// The local-asset city set and the curated external-URL table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageTables {
    local_assets: BTreeSet<String>,
    curated: BTreeMap<String, ImageSourceEntry>,
}

impl ImageTables {
    /// Builds tables from explicit contents.
    #[must_use]
    pub fn new(
        local_assets: impl IntoIterator<Item = String>,
        curated: impl IntoIterator<Item = (String, ImageSourceEntry)>,
    ) -> Self {
        Self {
            local_assets: local_assets.into_iter().collect(),
            curated: curated.into_iter().collect(),
        }
    }

    /// Returns the tables bundled with the binary.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. It is a compile-time
    /// constant, so a failure here is a development error caught by tests.
    #[must_use]
    pub fn bundled() -> Self {
        Self::from_toml_str(BUNDLED_TABLES)
            .unwrap_or_else(|e| panic!("Failed to parse bundled image tables: {e}"))
    }

    /// Parses tables from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ImageTablesError::Toml`] if the document is malformed.
    pub fn from_toml_str(s: &str) -> Result<Self, ImageTablesError> {
        let def: ImageTablesDef = toml::de::from_str(s)?;
        Ok(Self::from(def))
    }

    /// Reads and parses tables from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ImageTablesError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ImageTablesError> {
        log::info!("Loading image tables from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        let tables = Self::from_toml_str(&contents)?;
        log::debug!(
            "Loaded {} local-asset cities and {} curated images",
            tables.local_assets.len(),
            tables.curated.len()
        );
        Ok(tables)
    }

    /// Whether `city` must use a bundled local asset.
    #[must_use]
    pub fn is_local_asset(&self, city: &str) -> bool {
        self.local_assets.contains(city)
    }

    /// Looks up the curated image entry for `city`.
    #[must_use]
    pub fn curated(&self, city: &str) -> Option<&ImageSourceEntry> {
        self.curated.get(city)
    }

    /// Iterates over the local-asset city names in sorted order.
    pub fn local_assets(&self) -> impl Iterator<Item = &str> {
        self.local_assets.iter().map(String::as_str)
    }

    /// Iterates over curated entries in city-name order.
    pub fn curated_entries(&self) -> impl Iterator<Item = (&str, &ImageSourceEntry)> {
        self.curated.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of cities with a curated image.
    #[must_use]
    pub fn curated_count(&self) -> usize {
        self.curated.len()
    }
}

impl From<ImageTablesDef> for ImageTables {
    fn from(def: ImageTablesDef) -> Self {
        Self::new(def.local_assets, def.curated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_remote(url: &str) -> bool {
        url.starts_with("http://") || url.starts_with("https://")
    }

    #[test]
    fn loads_bundled_tables() {
        let tables = ImageTables::bundled();
        assert_eq!(
            tables.local_assets().count(),
            EXPECTED_LOCAL_ASSET_COUNT,
            "Update EXPECTED_LOCAL_ASSET_COUNT after editing image_tables.toml"
        );
        assert_eq!(
            tables.curated_count(),
            EXPECTED_CURATED_COUNT,
            "Update EXPECTED_CURATED_COUNT after editing image_tables.toml"
        );
    }

    #[test]
    fn curated_entries_are_remote_with_local_fallbacks() {
        for (city, entry) in ImageTables::bundled().curated_entries() {
            assert!(is_remote(&entry.url), "{city}: curated url is not remote");
            if let Some(fallback) = &entry.fallback {
                assert!(!fallback.is_empty(), "{city}: empty fallback");
                assert_ne!(fallback, &entry.url, "{city}: fallback equals url");
                assert!(
                    !is_remote(fallback),
                    "{city}: fallback should be a bundled path"
                );
            }
        }
    }

    #[test]
    fn local_asset_names_are_not_urls() {
        for city in ImageTables::bundled().local_assets() {
            assert!(!city.trim().is_empty(), "empty local-asset city name");
            assert!(!is_remote(city), "local-asset entry {city} looks like a URL");
        }
    }

    #[test]
    fn lookup_returns_none_for_unknown_city() {
        let tables = ImageTables::bundled();
        assert!(tables.curated("Atlantis").is_none());
        assert!(!tables.is_local_asset("Atlantis"));
    }

    #[test]
    fn lookups_are_case_sensitive() {
        let tables = ImageTables::bundled();
        assert!(tables.is_local_asset("Agra"));
        assert!(!tables.is_local_asset("agra"));
    }

    #[test]
    fn parses_minimal_toml() {
        let tables = ImageTables::from_toml_str(
            r#"
            local_assets = ["Pune"]

            [curated.Surat]
            url = "https://example.com/surat.jpg"
            "#,
        )
        .unwrap();
        assert!(tables.is_local_asset("Pune"));
        let surat = tables.curated("Surat").unwrap();
        assert_eq!(surat.url, "https://example.com/surat.jpg");
        assert!(surat.fallback.is_none());
        assert!(surat.description.is_none());
    }

    #[test]
    fn empty_document_yields_empty_tables() {
        let tables = ImageTables::from_toml_str("").unwrap();
        assert_eq!(tables, ImageTables::default());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = ImageTables::from_toml_str("local_assets = [").unwrap_err();
        assert!(matches!(err, ImageTablesError::Toml(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ImageTables::load(Path::new("/nonexistent/image_tables.toml")).unwrap_err();
        assert!(matches!(err, ImageTablesError::Io(_)));
    }
}
