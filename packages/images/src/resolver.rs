//! Image URL resolution for city names.
//!
//! Precedence (first match wins), evaluated fresh on every call:
//!
//! 1. city is in the local-asset set: `/images/cities/<slug>.jpg`
//! 2. city has a curated entry: the entry's `url`
//! 3. anything else: [`DEFAULT_HERITAGE_PATH`]

use globetrotter_images_models::{ImageSource, ResolvedImage};

use crate::{DEFAULT_HERITAGE_PATH, ImageTables, LOCAL_ASSET_DIR, LOCAL_ASSET_EXTENSION};

/// Resolves city names to image URLs against a set of [`ImageTables`].
#[derive(Debug, Clone, Default)]
pub struct ImageResolver {
    tables: ImageTables,
}

impl ImageResolver {
    /// Creates a resolver over the given tables.
    #[must_use]
    pub fn new(tables: ImageTables) -> Self {
        Self { tables }
    }

    /// Creates a resolver over the tables bundled with the binary.
    #[must_use]
    pub fn bundled() -> Self {
        Self::new(ImageTables::bundled())
    }

    /// The tables this resolver consults.
    #[must_use]
    pub const fn tables(&self) -> &ImageTables {
        &self.tables
    }

    /// Swaps in new tables. Already-resolved URLs are not touched; callers
    /// re-resolve them (e.g. via a catalog refresh).
    pub fn replace_tables(&mut self, tables: ImageTables) -> ImageTables {
        std::mem::replace(&mut self.tables, tables)
    }

    /// Resolves the image URL to display for `city`.
    #[must_use]
    pub fn resolve(&self, city: &str) -> String {
        self.resolve_with_source(city).url
    }

    /// Like [`Self::resolve`], also reporting which precedence step matched.
    #[must_use]
    pub fn resolve_with_source(&self, city: &str) -> ResolvedImage {
        if self.tables.is_local_asset(city) {
            return local_asset(city);
        }
        if let Some(entry) = self.tables.curated(city) {
            return ResolvedImage {
                url: entry.url.clone(),
                source: ImageSource::Curated,
            };
        }
        default_image()
    }

    /// Resolves an alternative image for `city` after `previously_tried`
    /// failed to load.
    ///
    /// Local-asset cities keep their local path. Curated cities get their
    /// `fallback` when it exists and differs from `previously_tried`;
    /// everything else gets the generic default path.
    #[must_use]
    pub fn resolve_fallback(&self, city: &str, previously_tried: &str) -> String {
        self.resolve_fallback_with_source(city, previously_tried).url
    }

    /// Like [`Self::resolve_fallback`], also reporting which step matched.
    #[must_use]
    pub fn resolve_fallback_with_source(&self, city: &str, previously_tried: &str) -> ResolvedImage {
        if self.tables.is_local_asset(city) {
            return local_asset(city);
        }
        if let Some(fallback) = self
            .tables
            .curated(city)
            .and_then(|entry| entry.fallback.as_deref())
            .filter(|fallback| *fallback != previously_tried)
        {
            return ResolvedImage {
                url: fallback.to_string(),
                source: ImageSource::Curated,
            };
        }
        default_image()
    }
}

/// Builds the bundled asset path for `city`.
///
/// The name is lower-cased and every run of whitespace becomes a single
/// hyphen, so `"Leh  Mini"` maps to `/images/cities/leh-mini.jpg`.
#[must_use]
pub fn local_asset_path(city: &str) -> String {
    let slug = city
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    format!("{LOCAL_ASSET_DIR}/{slug}.{LOCAL_ASSET_EXTENSION}")
}

fn local_asset(city: &str) -> ResolvedImage {
    ResolvedImage {
        url: local_asset_path(city),
        source: ImageSource::LocalAsset,
    }
}

fn default_image() -> ResolvedImage {
    ResolvedImage {
        url: DEFAULT_HERITAGE_PATH.to_string(),
        source: ImageSource::Default,
    }
}
