//! List fetch orchestration.
//!
//! Turns a category into listing requests, enriches every result with its
//! IMDb id and hands the catalog to the writer. Categories run one after
//! another; IMDb lookups within a category fan out with a bounded,
//! order-preserving stream.

use std::panic::AssertUnwindSafe;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use tracing::{debug, error, info, instrument, warn};

use crate::adapters::{ReqwestTransport, TmdbClient, Transport};
use crate::domain::{Category, ContentKind, EnrichedItem, RawItem};
use crate::library::{Catalog, CatalogWriter, WriteOutcome};

/// Default number of concurrent IMDb lookups
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Main fetch orchestrator
pub struct Orchestrator<T = ReqwestTransport> {
    client: TmdbClient<T>,
    concurrency: usize,
}

impl<T: Transport> Orchestrator<T> {
    pub fn new(client: TmdbClient<T>) -> Self {
        Self {
            client,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set the lookup fan-out (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn client(&self) -> &TmdbClient<T> {
        &self.client
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetch and enrich one category.
    ///
    /// Items whose IMDb id can't be resolved are dropped.
    #[instrument(skip(self, category), fields(slug = %category.slug))]
    pub async fn run(&self, category: &Category) -> Catalog {
        let (endpoint, params, kind) = category.request();
        info!(%endpoint, %kind, "Fetching category");

        let raw = self.client.fetch(&endpoint, &params).await;
        let fetched = raw.len();

        let items: Vec<EnrichedItem> = stream::iter(raw)
            .map(|item| self.enrich(item, kind))
            .buffered(self.concurrency)
            .filter_map(|item| async move { item })
            .collect()
            .await;

        debug!(fetched, kept = items.len(), "Enrichment finished");
        Catalog::new(category.slug.clone(), kind, items)
    }

    async fn enrich(&self, raw: RawItem, kind: ContentKind) -> Option<EnrichedItem> {
        match self.client.resolve_imdb_id(raw.id, kind).await {
            Some(imdb_id) => Some(EnrichedItem::new(raw, imdb_id, kind)),
            None => {
                debug!(tmdb_id = raw.id, title = %raw.title, "No IMDb id, skipping");
                None
            }
        }
    }

    /// Fetch and write one category
    pub async fn sync(&self, category: &Category, writer: &CatalogWriter) -> Result<WriteOutcome> {
        let catalog = self.run(category).await;
        writer.write(&catalog).await
    }

    /// Process every category in order.
    ///
    /// A failing (or panicking) category is logged with its slug and
    /// recorded in the report; the remaining categories still run.
    pub async fn run_batch(&self, categories: &[Category], writer: &CatalogWriter) -> BatchReport {
        let mut report = BatchReport::start();

        for category in categories {
            let started = Instant::now();
            let result = AssertUnwindSafe(self.sync(category, writer))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    Err(anyhow::anyhow!("panicked: {}", panic_message(panic.as_ref())))
                });
            let duration_ms = started.elapsed().as_millis() as u64;

            let status = match result {
                Ok(outcome) if outcome.is_empty() => {
                    warn!(
                        slug = %category.slug,
                        path = %outcome.path.display(),
                        "Category produced no items"
                    );
                    CategoryStatus::Empty {
                        path: outcome.path.display().to_string(),
                    }
                }
                Ok(outcome) => {
                    info!(
                        slug = %category.slug,
                        items = outcome.items,
                        duration_ms,
                        "Category saved"
                    );
                    CategoryStatus::Written {
                        path: outcome.path.display().to_string(),
                        items: outcome.items,
                    }
                }
                Err(e) => {
                    let message = format!("{:#}", e);
                    error!(slug = %category.slug, error = %message, "Category failed");
                    CategoryStatus::Failed { error: message }
                }
            };

            report.outcomes.push(CategoryOutcome {
                slug: category.slug.clone(),
                name: category.name.clone(),
                status,
                duration_ms,
            });
        }

        report.finish();
        report
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// What happened to one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryStatus {
    /// Catalog written with at least one item
    Written { path: String, items: usize },

    /// Empty catalog written
    Empty { path: String },

    /// Fetch or write failed
    Failed { error: String },
}

#[derive(Debug, Clone)]
pub struct CategoryOutcome {
    pub slug: String,
    pub name: String,
    pub status: CategoryStatus,
    pub duration_ms: u64,
}

/// Summary of a batch run
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub outcomes: Vec<CategoryOutcome>,
}

impl BatchReport {
    fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            outcomes: Vec::new(),
        }
    }

    fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn written(&self) -> usize {
        self.count(|s| matches!(s, CategoryStatus::Written { .. }))
    }

    pub fn empty(&self) -> usize {
        self.count(|s| matches!(s, CategoryStatus::Empty { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, CategoryStatus::Failed { .. }))
    }

    /// Total items written across all categories
    pub fn total_items(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                CategoryStatus::Written { items, .. } => items,
                _ => 0,
            })
            .sum()
    }

    fn count(&self, pred: impl Fn(&CategoryStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}
