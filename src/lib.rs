//! limenovel - presentation layer for the LimeNovel reading site.
//!
//! This library provides functionality for:
//! - Loading and caching the novel catalog from the remote API
//! - Resolving cover images with credentialed fetches and placeholders
//! - Building search, genre, carousel and detail views
//! - Rendering those views as escaped HTML

pub mod api;
pub mod batch;
pub mod carousel;
pub mod catalog;
pub mod config;
pub mod console;
pub mod diagnostics;
pub mod error;
pub mod genres;
pub mod images;
pub mod models;
pub mod navigation;
pub mod render;
pub mod token;
pub mod views;

#[cfg(test)]
mod test_helpers;

// Re-export commonly used types
pub use api::{HttpNovelApi, NovelApi};
pub use carousel::{Carousel, MountedCarousel, SlideGeometry};
pub use catalog::{CatalogCache, CatalogSnapshot};
pub use config::Config;
pub use console::Console;
pub use diagnostics::DiagnosticLog;
pub use error::{ApiError, ConfigError, NavigationError, TokenError};
pub use genres::{GenreMenu, genre_index};
pub use images::{CoverSource, ImageResolver, normalize_image_url};
pub use models::{Catalog, Chapter, Novel};
pub use navigation::{ChapterRoute, DetailRoute, Links};
pub use token::TokenStore;
pub use views::{ChapterOrder, Library, Notice, RenderOutcome};
