//! Command-line interface for catalog-sync.
//!
//! Provides commands for syncing catalogs, listing the configured
//! categories and showing the resolved configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::adapters::TmdbClient;
use crate::config::{self, ResolvedConfig};
use crate::core::{categories, BatchReport, CategoryStatus, Orchestrator};
use crate::domain::{Category, ContentKind, QuerySpec};
use crate::library::CatalogWriter;

/// catalog-sync - Build per-category IMDb catalogs from TMDb lists
#[derive(Parser, Debug)]
#[command(name = "catalog-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every selected category and write its catalog
    Sync {
        /// Only sync categories whose slug matches one of these globs (comma-separated)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Only sync categories of this kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pages to request per listing (overrides config)
        #[arg(long)]
        pages: Option<u32>,

        /// Concurrent IMDb lookups per category (overrides config)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// List the configured categories
    Categories {
        /// Filter by content kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Content kind for CLI (maps to ContentKind)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    /// TV series
    Series,

    /// Movies
    Movie,
}

impl From<KindArg> for ContentKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Series => ContentKind::Series,
            KindArg::Movie => ContentKind::Movie,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let cfg = config::load_config()?;

        match self.command {
            Commands::Sync {
                only,
                kind,
                output,
                pages,
                concurrency,
            } => {
                let cfg = apply_overrides(cfg, output, pages, concurrency);
                sync(&cfg, &only, kind.map(Into::into)).await
            }
            Commands::Categories { kind } => list_categories(&cfg, kind.map(Into::into)),
            Commands::Config => {
                show_config(&cfg);
                Ok(())
            }
        }
    }
}

fn apply_overrides(
    mut cfg: ResolvedConfig,
    output: Option<PathBuf>,
    pages: Option<u32>,
    concurrency: Option<usize>,
) -> ResolvedConfig {
    if let Some(output) = output {
        cfg.output_dir = output;
    }
    if let Some(pages) = pages {
        cfg.page_limit = pages.max(1);
    }
    if let Some(concurrency) = concurrency {
        cfg.concurrency = concurrency.max(1);
    }
    cfg
}

fn resolve_categories(cfg: &ResolvedConfig) -> Result<Vec<Category>> {
    categories::list(cfg.categories.as_deref()).context("Invalid category definitions")
}

async fn sync(cfg: &ResolvedConfig, only: &[String], kind: Option<ContentKind>) -> Result<()> {
    let settings = cfg.client_settings()?;
    let selected = categories::select(resolve_categories(cfg)?, only, kind)?;

    if selected.is_empty() {
        eprintln!("⚠️ No categories matched the selection");
        return Ok(());
    }

    let orchestrator =
        Orchestrator::new(TmdbClient::new(settings)).with_concurrency(cfg.concurrency);
    let writer = CatalogWriter::new(&cfg.output_dir).with_kind_suffix(cfg.append_kind_suffix);

    eprintln!(
        "📥 Syncing {} categories into {}",
        selected.len(),
        cfg.output_dir.display()
    );

    let report = orchestrator.run_batch(&selected, &writer).await;
    print_report(&report);

    Ok(())
}

fn print_report(report: &BatchReport) {
    for outcome in &report.outcomes {
        match &outcome.status {
            CategoryStatus::Written { path, items } => {
                eprintln!("✅ {}: saved {} items to {}", outcome.name, items, path)
            }
            CategoryStatus::Empty { path } => {
                eprintln!("⚠️ {}: no items, wrote empty {}", outcome.name, path)
            }
            CategoryStatus::Failed { error } => {
                eprintln!("❌ Failed to process {}: {}", outcome.slug, error)
            }
        }
    }

    let elapsed = report
        .finished_at
        .map(|done| (done - report.started_at).num_seconds())
        .unwrap_or_default();

    eprintln!(
        "\n[{} written, {} empty, {} failed; {} items in {}s]",
        report.written(),
        report.empty(),
        report.failed(),
        report.total_items(),
        elapsed
    );
}

fn list_categories(cfg: &ResolvedConfig, kind: Option<ContentKind>) -> Result<()> {
    let categories = categories::select(resolve_categories(cfg)?, &[], kind)?;

    println!("{:<20} {:<8} {:<22} {:<30}", "SLUG", "KIND", "NAME", "QUERY");
    println!("{}", "-".repeat(80));

    for category in &categories {
        let query = match &category.query {
            QuerySpec::Special(list) => format!("special: {}", list),
            QuerySpec::Filters(filters) => filters
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&"),
        };
        println!(
            "{:<20} {:<8} {:<22} {:<30}",
            category.slug,
            category.request().2.to_string(),
            category.name,
            query
        );
    }

    println!("\nTotal: {} categories", categories.len());
    Ok(())
}

fn show_config(cfg: &ResolvedConfig) {
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("API key:      {}", cfg.masked_api_key());
    println!("Base URL:     {}", cfg.base_url);
    println!("Language:     {}", cfg.language.as_deref().unwrap_or("(unset)"));
    println!("Region:       {}", cfg.region.as_deref().unwrap_or("(unset)"));
    println!("Page limit:   {}", cfg.page_limit);
    println!("Concurrency:  {}", cfg.concurrency);
    println!("Output dir:   {}", cfg.output_dir.display());
    println!("Kind suffix:  {}", cfg.append_kind_suffix);
    println!(
        "Categories:   {}",
        match &cfg.categories {
            Some(defs) => format!("{} from config file", defs.len()),
            None => "built-in".to_string(),
        }
    );
}
