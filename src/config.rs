//! Configuration for catalog-sync.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI)
//! 2. Environment variables (TMDB_API_KEY, TMDB_BASE_URL, CATALOG_SYNC_OUTPUT)
//! 3. Config file (.catalog-sync/config.yaml)
//! 4. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .catalog-sync/config.yaml
//! - Relative output paths resolve against the directory holding .catalog-sync/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::{ClientSettings, DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
use crate::core::categories::CategoryDef;
use crate::core::DEFAULT_CONCURRENCY;

pub const CONFIG_DIR: &str = ".catalog-sync";
pub const CONFIG_FILE: &str = "config.yaml";

pub const ENV_API_KEY: &str = "TMDB_API_KEY";
pub const ENV_BASE_URL: &str = "TMDB_BASE_URL";
pub const ENV_OUTPUT: &str = "CATALOG_SYNC_OUTPUT";

const DEFAULT_OUTPUT_DIR: &str = "catalogs";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Replaces the built-in categories when present
    #[serde(default)]
    pub categories: Option<Vec<CategoryDef>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub language: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchConfig {
    pub page_limit: Option<u32>,
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    pub dir: Option<String>,
    pub append_kind_suffix: Option<bool>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// API credential, read once from the environment
    pub api_key: Option<String>,
    pub base_url: String,
    pub language: Option<String>,
    pub region: Option<String>,
    pub page_limit: u32,
    pub concurrency: usize,
    pub output_dir: PathBuf,
    pub append_kind_suffix: bool,
    pub categories: Option<Vec<CategoryDef>>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            language: Some(DEFAULT_LANGUAGE.to_string()),
            region: None,
            page_limit: 1,
            concurrency: DEFAULT_CONCURRENCY,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            append_kind_suffix: false,
            categories: None,
            config_file: None,
        }
    }
}

impl ResolvedConfig {
    /// Client settings; fails when no API key is configured
    pub fn client_settings(&self) -> Result<ClientSettings> {
        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .with_context(|| format!("{} is not set", ENV_API_KEY))?;

        Ok(ClientSettings {
            api_key,
            base_url: self.base_url.clone(),
            language: self.language.clone(),
            region: self.region.clone(),
            page_limit: self.page_limit.max(1),
        })
    }

    /// API key with everything but the last four characters hidden
    pub fn masked_api_key(&self) -> String {
        match &self.api_key {
            None => "(not set)".to_string(),
            Some(key) => {
                let count = key.chars().count();
                if count <= 4 {
                    "****".to_string()
                } else {
                    let tail: String = key.chars().skip(count - 4).collect();
                    format!("****{}", tail)
                }
            }
        }
    }
}

/// Find config file by searching a directory and its parents
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to a base directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Environment values consulted during resolution
#[derive(Debug, Clone, Default)]
pub struct Env {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub output: Option<String>,
}

impl Env {
    /// Read the process environment
    pub fn from_process() -> Self {
        Self {
            api_key: std::env::var(ENV_API_KEY).ok(),
            base_url: std::env::var(ENV_BASE_URL).ok(),
            output: std::env::var(ENV_OUTPUT).ok(),
        }
    }
}

/// Merge an optional config file and the environment over the defaults
pub fn resolve(file: Option<(PathBuf, ConfigFile)>, env: Env) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let (config_file, file) = match file {
        Some((path, file)) => (Some(path), file),
        None => (None, ConfigFile::default()),
    };

    // Project root is the parent of .catalog-sync/
    let base_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .map(Path::to_path_buf);

    let output_dir = match (env.output, file.output.dir) {
        (Some(dir), _) => PathBuf::from(dir),
        (None, Some(dir)) => match &base_dir {
            Some(base) => resolve_path(base, &dir),
            None => PathBuf::from(dir),
        },
        (None, None) => defaults.output_dir,
    };

    ResolvedConfig {
        api_key: env.api_key,
        base_url: env
            .base_url
            .or(file.api.base_url)
            .unwrap_or(defaults.base_url),
        language: file.api.language.or(defaults.language),
        region: file.api.region.or(defaults.region),
        page_limit: file.fetch.page_limit.unwrap_or(defaults.page_limit).max(1),
        concurrency: file
            .fetch
            .concurrency
            .unwrap_or(defaults.concurrency)
            .max(1),
        output_dir,
        append_kind_suffix: file
            .output
            .append_kind_suffix
            .unwrap_or(defaults.append_kind_suffix),
        categories: file.categories,
        config_file,
    }
}

/// Load configuration from all sources
pub fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let file = match find_config_file(&cwd) {
        Some(path) => {
            let parsed = load_config_file(&path)?;
            Some((path, parsed))
        }
        None => None,
    };

    Ok(resolve(file, Env::from_process()))
}
