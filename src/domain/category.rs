//! Category definitions.
//!
//! A category names one output list: which kind of content it holds and
//! how to query the API for it, either through discover filters or one of
//! the fixed special endpoints.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of content a category holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// TV series
    #[default]
    Series,

    /// Feature films
    Movie,
}

impl ContentKind {
    /// Path segment used by the API for this kind
    pub fn api_segment(self) -> &'static str {
        match self {
            ContentKind::Series => "tv",
            ContentKind::Movie => "movie",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Series => write!(f, "series"),
            ContentKind::Movie => write!(f, "movie"),
        }
    }
}

impl FromStr for ContentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "series" | "tv" | "show" | "shows" => Ok(ContentKind::Series),
            "movie" | "movies" | "film" => Ok(ContentKind::Movie),
            _ => anyhow::bail!("Unknown content kind: {}", s),
        }
    }
}

/// Named list served by a fixed endpoint instead of discover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialList {
    /// Weekly trending list of the category's kind
    Trending,

    /// Popular list of the category's kind
    Popular,

    /// Movies currently in cinemas
    NowPlaying,

    /// Series airing today
    AiringToday,
}

impl SpecialList {
    /// Endpoint path and the content kind the endpoint actually returns.
    ///
    /// `now_playing` and `airing_today` only exist for one kind, so the
    /// category's own kind is ignored for them.
    pub fn route(self, kind: ContentKind) -> (String, ContentKind) {
        match self {
            SpecialList::Trending => (format!("/trending/{}/week", kind.api_segment()), kind),
            SpecialList::Popular => (format!("/{}/popular", kind.api_segment()), kind),
            SpecialList::NowPlaying => ("/movie/now_playing".to_string(), ContentKind::Movie),
            SpecialList::AiringToday => ("/tv/airing_today".to_string(), ContentKind::Series),
        }
    }
}

impl fmt::Display for SpecialList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpecialList::Trending => "trending",
            SpecialList::Popular => "popular",
            SpecialList::NowPlaying => "now_playing",
            SpecialList::AiringToday => "airing_today",
        };
        f.write_str(s)
    }
}

/// How a category is queried
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySpec {
    /// Discover filters passed through unchanged (e.g. `with_genres=35`)
    Filters(BTreeMap<String, String>),

    /// Fixed endpoint
    Special(SpecialList),
}

/// A single output list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Unique, filename-safe identifier
    pub slug: String,

    /// Human-readable name
    pub name: String,

    /// Kind of content requested
    pub kind: ContentKind,

    /// Query definition
    pub query: QuerySpec,
}

impl Category {
    /// Create a category backed by discover filters
    pub fn with_filters<K, V>(
        slug: impl Into<String>,
        name: impl Into<String>,
        kind: ContentKind,
        filters: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            slug: slug.into(),
            name: name.into(),
            kind,
            query: QuerySpec::Filters(
                filters
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Create a category backed by a special list
    pub fn special(
        slug: impl Into<String>,
        name: impl Into<String>,
        kind: ContentKind,
        special: SpecialList,
    ) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            kind,
            query: QuerySpec::Special(special),
        }
    }

    /// Resolve the endpoint, query parameters and effective content kind
    pub fn request(&self) -> (String, BTreeMap<String, String>, ContentKind) {
        match &self.query {
            QuerySpec::Special(special) => {
                let (endpoint, kind) = special.route(self.kind);
                (endpoint, BTreeMap::new(), kind)
            }
            QuerySpec::Filters(filters) => (
                format!("/discover/{}", self.kind.api_segment()),
                filters.clone(),
                self.kind,
            ),
        }
    }

    /// Whether the slug can be used verbatim as a file name
    pub fn has_safe_slug(&self) -> bool {
        !self.slug.is_empty()
            && self
                .slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}
