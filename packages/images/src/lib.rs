#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City image tables, image URL resolution, and the render-time fallback
//! guard.
//!
//! Every city name resolves to exactly one image URL using a fixed
//! precedence: bundled local asset, then curated remote URL, then the
//! generic heritage placeholder. The same precedence drives
//! [`ImageResolver::resolve_fallback`], which the [`guard::FallbackGuard`]
//! state machine uses when an image fails to load in the browser.

pub mod guard;
pub mod resolver;
pub mod tables;

pub use globetrotter_images_models::{ImageSource, ImageSourceEntry, ResolvedImage};
pub use resolver::ImageResolver;
pub use tables::ImageTables;

/// Directory that bundled city images are served from.
pub const LOCAL_ASSET_DIR: &str = "/images/cities";

/// File extension of bundled city images.
pub const LOCAL_ASSET_EXTENSION: &str = "jpg";

/// Placeholder used when a city has neither a local asset nor a curated
/// image.
pub const DEFAULT_HERITAGE_PATH: &str = "/images/cities/default-heritage.jpg";

/// Remote image query used by the fallback guard as a last resort.
pub const GENERIC_REMOTE_HERITAGE_URL: &str =
    "https://source.unsplash.com/featured/800x600/?india,heritage";

/// Errors that can occur while loading image tables.
#[derive(Debug, thiserror::Error)]
pub enum ImageTablesError {
    /// I/O error reading a table file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
