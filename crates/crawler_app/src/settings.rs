use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use crawler_engine::CrawlConfig;
use url::Url;

use crate::cli::Cli;

/// Reads a RON crawl config. Missing fields keep their defaults.
pub fn load_config(path: &Path) -> Result<CrawlConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    ron::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}

/// Config file (if any) with command-line overrides applied on top.
pub fn resolve(cli: &Cli) -> Result<CrawlConfig> {
    let base = match cli.config.as_deref() {
        Some(path) => load_config(path)?,
        None => CrawlConfig::default(),
    };
    Ok(apply_overrides(base, cli))
}

fn apply_overrides(mut config: CrawlConfig, cli: &Cli) -> CrawlConfig {
    if let Some(scope) = &cli.scope {
        config.scope = scope.clone();
    }
    if config.scope.trim().is_empty() {
        // Admission compares serialized URLs, so the scope must be serialized the same way.
        config.scope = match Url::parse(&cli.seed) {
            Ok(seed) => seed.to_string(),
            Err(_) => cli.seed.clone(),
        };
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if let Some(out) = &cli.out {
        config.destination_root = out.clone();
    }
    if !cli.extensions.is_empty() {
        config.allowed_extensions = cli.extensions.clone();
    }
    if let Some(width) = cli.min_width {
        config.min_width = width;
    }
    if let Some(height) = cli.min_height {
        config.min_height = height;
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = timeout;
    }
    config
}
