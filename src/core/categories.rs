//! The category catalog.
//!
//! Built-in categories cover streaming services, special lists and genres.
//! A config file may replace them with its own YAML definitions.

use std::collections::{BTreeMap, HashSet};

use glob::Pattern;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Category, ContentKind, SpecialList};

/// Category validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    #[error("Category slug is empty")]
    EmptySlug,

    #[error("Category slug '{0}' is not filename-safe (use letters, digits, '-' and '_')")]
    UnsafeSlug(String),

    #[error("Duplicate category slug: {0}")]
    DuplicateSlug(String),

    #[error("Category '{0}' has neither tmdb_params nor special")]
    NoQuery(String),

    #[error("Invalid slug pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

enum Query {
    Filter(&'static str, &'static str),
    Special(SpecialList),
}

struct Entry {
    slug: &'static str,
    name: &'static str,
    kind: ContentKind,
    query: Query,
}

const fn filter(
    slug: &'static str,
    name: &'static str,
    kind: ContentKind,
    key: &'static str,
    value: &'static str,
) -> Entry {
    Entry {
        slug,
        name,
        kind,
        query: Query::Filter(key, value),
    }
}

const fn special(
    slug: &'static str,
    name: &'static str,
    kind: ContentKind,
    list: SpecialList,
) -> Entry {
    Entry {
        slug,
        name,
        kind,
        query: Query::Special(list),
    }
}

use ContentKind::{Movie, Series};

const BUILTIN: &[Entry] = &[
    // Streaming services
    filter("netflix-series", "Netflix Series", Series, "with_networks", "213"),
    filter("netflix-movies", "Netflix Movies", Movie, "with_networks", "213"),
    filter("disney-series", "Disney+ Series", Series, "with_networks", "2739"),
    filter("disney-movies", "Disney+ Movies", Movie, "with_networks", "2739"),
    filter("prime-series", "Prime Series", Series, "with_networks", "1024"),
    filter("prime-movies", "Prime Movies", Movie, "with_networks", "1024"),
    filter("apple-series", "Apple TV+ Series", Series, "with_networks", "2552"),
    filter("apple-movies", "Apple TV+ Movies", Movie, "with_networks", "2552"),
    filter("stan-series", "Stan Series", Series, "with_keywords", "186729"),
    filter("stan-movies", "Stan Movies", Movie, "with_keywords", "186729"),
    // Special lists
    special("trending-series", "Trending Series", Series, SpecialList::Trending),
    special("trending-movies", "Trending Movies", Movie, SpecialList::Trending),
    special("popular-series", "Popular Series", Series, SpecialList::Popular),
    special("popular-movies", "Popular Movies", Movie, SpecialList::Popular),
    special("cinema", "In Cinemas", Movie, SpecialList::NowPlaying),
    special("newreleases", "New Releases", Series, SpecialList::AiringToday),
    // Genres
    filter("action-series", "Action Series", Series, "with_genres", "10759"),
    filter("action-movies", "Action Movies", Movie, "with_genres", "28"),
    filter("comedy-series", "Comedy Series", Series, "with_genres", "35"),
    filter("comedy-movies", "Comedy Movies", Movie, "with_genres", "35"),
    filter("family-series", "Family Series", Series, "with_genres", "10751"),
    filter("family-movies", "Family Movies", Movie, "with_genres", "10751"),
    filter("horror-series", "Horror Series", Series, "with_genres", "27"),
    filter("horror-movies", "Horror Movies", Movie, "with_genres", "27"),
    filter("kids-series", "Kids Series", Series, "with_genres", "10762"),
    filter("kids-movies", "Kids Movies", Movie, "with_genres", "16"),
    filter("thriller-series", "Thriller Series", Series, "with_genres", "53"),
    filter("thriller-movies", "Thriller Movies", Movie, "with_genres", "53"),
    filter("romance-series", "Romance Series", Series, "with_genres", "10749"),
    filter("romance-movies", "Romance Movies", Movie, "with_genres", "10749"),
    filter("adventure-series", "Adventure Series", Series, "with_genres", "12"),
    filter("adventure-movies", "Adventure Movies", Movie, "with_genres", "12"),
];

/// Built-in categories in their canonical order
pub fn builtin() -> Vec<Category> {
    BUILTIN
        .iter()
        .map(|entry| match entry.query {
            Query::Filter(key, value) => {
                Category::with_filters(entry.slug, entry.name, entry.kind, [(key, value)])
            }
            Query::Special(list) => Category::special(entry.slug, entry.name, entry.kind, list),
        })
        .collect()
}

/// Category definition as written in the config file
///
/// ```yaml
/// categories:
///   - slug: comedy-movies
///     name: Comedy Movies
///     type: movie
///     tmdb_params: { with_genres: "35" }
///   - slug: cinema
///     type: movie
///     special: now_playing
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDef {
    pub slug: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "type", default)]
    pub kind: ContentKind,

    #[serde(default)]
    pub tmdb_params: BTreeMap<String, String>,

    #[serde(default)]
    pub special: Option<SpecialList>,
}

impl CategoryDef {
    /// Convert to a category. `special` takes precedence over `tmdb_params`.
    pub fn into_category(self) -> Result<Category, CategoryError> {
        let name = self.name.unwrap_or_else(|| self.slug.clone());

        match self.special {
            Some(list) => Ok(Category::special(self.slug, name, self.kind, list)),
            None if self.tmdb_params.is_empty() => Err(CategoryError::NoQuery(self.slug)),
            None => Ok(Category::with_filters(
                self.slug,
                name,
                self.kind,
                self.tmdb_params,
            )),
        }
    }
}

/// Check slugs are present, filename-safe and unique
pub fn validate(categories: &[Category]) -> Result<(), CategoryError> {
    let mut seen = HashSet::new();

    for category in categories {
        if category.slug.is_empty() {
            return Err(CategoryError::EmptySlug);
        }
        if !category.has_safe_slug() {
            return Err(CategoryError::UnsafeSlug(category.slug.clone()));
        }
        if !seen.insert(category.slug.as_str()) {
            return Err(CategoryError::DuplicateSlug(category.slug.clone()));
        }
    }

    Ok(())
}

/// Resolve the category list: config definitions if any, else built-ins
pub fn list(defs: Option<&[CategoryDef]>) -> Result<Vec<Category>, CategoryError> {
    let categories = match defs {
        Some(defs) => defs
            .iter()
            .cloned()
            .map(CategoryDef::into_category)
            .collect::<Result<Vec<_>, _>>()?,
        None => builtin(),
    };

    validate(&categories)?;
    Ok(categories)
}

/// Filter categories by slug glob patterns and content kind.
///
/// Kind matches the kind the category produces, so a `now_playing` list
/// declared as series is still a movie category. An empty pattern list
/// selects everything. Order is preserved.
pub fn select(
    categories: Vec<Category>,
    patterns: &[String],
    kind: Option<ContentKind>,
) -> Result<Vec<Category>, CategoryError> {
    let patterns = patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| CategoryError::InvalidPattern {
                pattern: p.clone(),
                message: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(categories
        .into_iter()
        .filter(|c| patterns.is_empty() || patterns.iter().any(|p| p.matches(&c.slug)))
        .filter(|c| kind.map_or(true, |k| c.request().2 == k))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QuerySpec;

    #[test]
    fn test_builtin_catalog_shape() {
        let categories = builtin();
        assert_eq!(categories.len(), 32);
        assert!(validate(&categories).is_ok());

        let specials = categories
            .iter()
            .filter(|c| matches!(c.query, QuerySpec::Special(_)))
            .count();
        assert_eq!(specials, 6);

        assert_eq!(categories[0].slug, "netflix-series");
        assert_eq!(categories[31].slug, "adventure-movies");
    }

    #[test]
    fn test_builtin_cinema_is_now_playing() {
        let cinema = builtin().into_iter().find(|c| c.slug == "cinema").unwrap();
        assert_eq!(cinema.kind, ContentKind::Movie);
        assert_eq!(cinema.query, QuerySpec::Special(SpecialList::NowPlaying));
    }

    #[test]
    fn test_category_defs_from_yaml() {
        let yaml = r#"
- slug: comedy-movies
  name: Comedy Movies
  type: movie
  tmdb_params:
    with_genres: "35"
- slug: cinema
  type: movie
  special: now_playing
  tmdb_params:
    with_genres: "99"
- slug: stan
  tmdb_params: { with_keywords: "186729" }
"#;
        let defs: Vec<CategoryDef> = serde_yaml::from_str(yaml).unwrap();
        let categories = list(Some(defs.as_slice())).unwrap();

        assert_eq!(categories.len(), 3);
        assert_eq!(categories[0].name, "Comedy Movies");
        // special wins over params
        assert_eq!(categories[1].query, QuerySpec::Special(SpecialList::NowPlaying));
        // name and kind defaults
        assert_eq!(categories[2].name, "stan");
        assert_eq!(categories[2].kind, ContentKind::Series);
    }

    #[test]
    fn test_def_without_query_is_rejected() {
        let def = CategoryDef {
            slug: "empty".to_string(),
            name: None,
            kind: ContentKind::Movie,
            tmdb_params: BTreeMap::new(),
            special: None,
        };
        assert_eq!(
            def.into_category(),
            Err(CategoryError::NoQuery("empty".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_bad_slugs() {
        let dup = vec![
            Category::special("a", "A", ContentKind::Movie, SpecialList::Popular),
            Category::special("a", "A again", ContentKind::Series, SpecialList::Popular),
        ];
        assert_eq!(validate(&dup), Err(CategoryError::DuplicateSlug("a".to_string())));

        let unsafe_slug = vec![Category::special(
            "a/b",
            "A",
            ContentKind::Movie,
            SpecialList::Popular,
        )];
        assert_eq!(
            validate(&unsafe_slug),
            Err(CategoryError::UnsafeSlug("a/b".to_string()))
        );

        let empty = vec![Category::special("", "A", ContentKind::Movie, SpecialList::Popular)];
        assert_eq!(validate(&empty), Err(CategoryError::EmptySlug));
    }

    #[test]
    fn test_select_by_pattern_and_kind() {
        let all = builtin();

        let movies = select(all.clone(), &["*-movies".to_string()], None).unwrap();
        assert_eq!(movies.len(), 15);
        assert!(movies.iter().all(|c| c.kind == ContentKind::Movie));

        let some = select(
            all.clone(),
            &["cinema".to_string(), "netflix-*".to_string()],
            Some(ContentKind::Movie),
        )
        .unwrap();
        let slugs: Vec<_> = some.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["netflix-movies", "cinema"]);

        assert_eq!(select(all.clone(), &[], None).unwrap().len(), 32);
        assert!(select(all, &["[".to_string()], None).is_err());
    }

    #[test]
    fn test_select_uses_produced_kind() {
        let def = CategoryDef {
            slug: "cinema".to_string(),
            name: None,
            kind: ContentKind::Series,
            tmdb_params: BTreeMap::new(),
            special: Some(SpecialList::NowPlaying),
        };
        let defs = vec![def];
        let categories = list(Some(defs.as_slice())).unwrap();

        let movies = select(categories.clone(), &[], Some(ContentKind::Movie)).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].slug, "cinema");

        assert!(select(categories, &[], Some(ContentKind::Series))
            .unwrap()
            .is_empty());
    }
}
