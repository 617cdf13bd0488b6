//! Domain types for catalog-sync.
//!
//! - Category: what to fetch and how
//! - RawItem / EnrichedItem: listing entries before and after IMDb lookup

pub mod category;
pub mod item;

pub use category::{Category, ContentKind, QuerySpec, SpecialList};
pub use item::{EnrichedItem, RawItem};
