#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City image source types and the image table TOML schema.
//!
//! Image tables map a city name to where its cover image comes from: a
//! locally bundled asset, a curated remote URL, or (implicitly) the generic
//! heritage placeholder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A curated remote image for a single city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSourceEntry {
    /// Primary remote image URL.
    pub url: String,
    /// Path to try when `url` fails to load.
    #[serde(default)]
    pub fallback: Option<String>,
    /// Short caption describing what the image shows.
    #[serde(default)]
    pub description: Option<String>,
}

/// On-disk (TOML) layout of the image tables.
///
/// ```toml
/// local_assets = ["Agra", "Leh Mini"]
///
/// [curated.Aurangabad]
/// url = "https://..."
/// fallback = "/images/cities/aurangabad.jpg"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTablesDef {
    /// Cities that always use a bundled local asset.
    #[serde(default)]
    pub local_assets: Vec<String>,
    /// Cities with a curated remote image, keyed by city name.
    #[serde(default)]
    pub curated: BTreeMap<String, ImageSourceEntry>,
}

/// Which precedence step produced a resolved image URL.
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
pub enum ImageSource {
    /// Bundled asset under `/images/cities/`.
    LocalAsset,
    /// Curated remote URL (or its fallback path).
    Curated,
    /// Generic heritage placeholder.
    Default,
}

/// A resolved image URL together with the step that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImage {
    /// URL or local path to display.
    pub url: String,
    /// Precedence step that matched.
    pub source: ImageSource,
}
