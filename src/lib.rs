//! catalog-sync - TMDb list to IMDb catalog batch job
//!
//! Polls TMDb listing endpoints for a fixed set of categories (streaming
//! services, genres, trending/popular/now-playing/airing-today lists),
//! looks up the IMDb id of every result and writes one JSON catalog per
//! category.
//!
//! # Modules
//!
//! - `adapters`: TMDb client (listings, external IDs) over a pluggable transport
//! - `core`: Category catalog and the fetch orchestrator
//! - `domain`: Data structures (Category, RawItem, EnrichedItem)
//! - `library`: Catalog serialization and writing
//! - `config`: Layered configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Sync everything into ./catalogs
//! TMDB_API_KEY=... catalog-sync sync
//!
//! # Only movie lists from streaming services
//! catalog-sync sync --only 'netflix-*,disney-*' --kind movie
//!
//! # Show the categories that would be synced
//! catalog-sync categories
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod library;

// Re-export main types at crate root for convenience
pub use crate::adapters::{ClientSettings, TmdbClient, Transport};
pub use crate::core::{BatchReport, Orchestrator};
pub use crate::domain::{Category, ContentKind, EnrichedItem, QuerySpec, RawItem, SpecialList};
pub use crate::library::{Catalog, CatalogWriter};
