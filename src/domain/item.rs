//! Items returned by the API and the enriched form written to catalogs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::category::ContentKind;

/// Result entry from a listing endpoint, reduced to the fields we use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    /// Primary API identifier
    pub id: u64,

    /// Display title (`name` for series, `title` for movies)
    pub title: String,
}

impl RawItem {
    /// Extract an item from an untyped result entry.
    ///
    /// Returns `None` when the entry has no numeric `id` or no title
    /// under either `name` or `title`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let id = value.get("id")?.as_u64()?;
        let title = ["name", "title"]
            .iter()
            .filter_map(|key| value.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty())?;

        Some(Self {
            id,
            title: title.to_string(),
        })
    }
}

/// Catalog entry: a title with its resolved IMDb identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedItem {
    /// Display title
    pub title: String,

    /// IMDb identifier (e.g. `tt0000007`)
    #[serde(rename = "imdb_id")]
    pub secondary_id: String,

    /// Kind of content
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

impl EnrichedItem {
    /// Attach a resolved identifier to a raw item
    pub fn new(raw: RawItem, secondary_id: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            title: raw.title,
            secondary_id: secondary_id.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_series_entry_uses_name() {
        let entry = json!({"id": 7, "name": "Y", "original_name": "Z"});
        let item = RawItem::from_value(&entry).unwrap();
        assert_eq!(item, RawItem { id: 7, title: "Y".to_string() });
    }

    #[test]
    fn test_movie_entry_uses_title() {
        let item = RawItem::from_value(&json!({"id": 42, "title": "X"})).unwrap();
        assert_eq!(item.title, "X");
    }

    #[test]
    fn test_empty_name_falls_back_to_title() {
        let item = RawItem::from_value(&json!({"id": 1, "name": "", "title": "T"})).unwrap();
        assert_eq!(item.title, "T");
    }

    #[test]
    fn test_unusable_entries_are_rejected() {
        assert!(RawItem::from_value(&json!({"name": "No id"})).is_none());
        assert!(RawItem::from_value(&json!({"id": "7", "name": "String id"})).is_none());
        assert!(RawItem::from_value(&json!({"id": 3})).is_none());
    }

    #[test]
    fn test_enriched_item_wire_format() {
        let raw = RawItem { id: 7, title: "Y".to_string() };
        let item = EnrichedItem::new(raw, "tt0000007", ContentKind::Series);

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({"title": "Y", "imdb_id": "tt0000007", "type": "series"})
        );
    }
}
