//! Catalogs and the writer that persists them.
//!
//! One JSON file per category. Each write replaces the previous file whole;
//! nothing is merged with earlier runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::{ContentKind, EnrichedItem};

/// Enriched items for one category, in API order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Slug of the category this catalog belongs to
    pub slug: String,

    /// Content kind of the items
    pub kind: ContentKind,

    /// Items in the order the API returned them
    pub items: Vec<EnrichedItem>,
}

impl Catalog {
    pub fn new(slug: impl Into<String>, kind: ContentKind, items: Vec<EnrichedItem>) -> Self {
        Self {
            slug: slug.into(),
            kind,
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialized file content: a pretty-printed JSON array
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.items).context("Failed to serialize catalog")
    }
}

/// Result of a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub path: PathBuf,
    pub items: usize,
}

impl WriteOutcome {
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }
}

/// Writes catalogs into an output directory
#[derive(Debug, Clone)]
pub struct CatalogWriter {
    output_dir: PathBuf,
    append_kind_suffix: bool,
}

impl CatalogWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            append_kind_suffix: false,
        }
    }

    /// Name files `<slug>-<kind>.json` instead of `<slug>.json`
    pub fn with_kind_suffix(mut self, enabled: bool) -> Self {
        self.append_kind_suffix = enabled;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the catalog will be written to
    pub fn path_for(&self, catalog: &Catalog) -> PathBuf {
        let file_name = if self.append_kind_suffix {
            format!("{}-{}.json", catalog.slug, catalog.kind)
        } else {
            format!("{}.json", catalog.slug)
        };
        self.output_dir.join(file_name)
    }

    /// Write a catalog, replacing any earlier file of the same name.
    ///
    /// Empty catalogs are still written so a stale list never outlives a
    /// run that found nothing.
    pub async fn write(&self, catalog: &Catalog) -> Result<WriteOutcome> {
        fs::create_dir_all(&self.output_dir).await.with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.output_dir.display()
            )
        })?;

        let path = self.path_for(catalog);
        let tmp_path = path.with_extension("json.tmp");
        let content = catalog.to_json()?;

        if let Err(e) = fs::write(&tmp_path, content).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e)
                .with_context(|| format!("Failed to write catalog: {}", tmp_path.display()));
        }
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e)
                .with_context(|| format!("Failed to replace catalog: {}", path.display()));
        }

        if catalog.is_empty() {
            warn!(slug = %catalog.slug, path = %path.display(), "Wrote empty catalog");
        } else {
            debug!(
                slug = %catalog.slug,
                items = catalog.len(),
                path = %path.display(),
                "Wrote catalog"
            );
        }

        Ok(WriteOutcome {
            path,
            items: catalog.len(),
        })
    }
}
