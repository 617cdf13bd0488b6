//! Catalog output.
//!
//! # Storage Layout
//!
//! ```text
//! catalogs/
//! ├── netflix-series.json     # [{"title", "imdb_id", "type"}, ...]
//! ├── cinema.json
//! └── ...
//! ```

pub mod catalog;

pub use catalog::{Catalog, CatalogWriter, WriteOutcome};
