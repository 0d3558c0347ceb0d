use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crawler_rules::{ImageRules, ScopeRules, DEFAULT_IMAGE_EXTENSIONS};
use serde::Deserialize;

use crate::crawler::Crawler;
use crate::fetch::{io_runtime, FetchClient, FetchSettings, ReqwestFetcher};
use crate::persist::ensure_output_dir;
use crate::processor::ImageProcessor;
use crate::EngineError;

/// Construction-time settings for an image crawl.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// URL prefix every crawled page must start with (ASCII case ignored).
    pub scope: String,
    pub threads: usize,
    pub destination_root: PathBuf,
    pub allowed_extensions: Vec<String>,
    pub min_width: u32,
    pub min_height: u32,
    pub request_timeout_secs: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            scope: String::new(),
            threads: thread::available_parallelism().map_or(1, |n| n.get()),
            destination_root: PathBuf::from("images"),
            allowed_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            min_width: 300,
            min_height: 300,
            request_timeout_secs: 30,
        }
    }
}

impl CrawlConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.scope.trim().is_empty() {
            return Err(EngineError::InvalidConfig("scope must not be empty".into()));
        }
        if self.threads == 0 {
            return Err(EngineError::InvalidConfig(
                "thread count must be positive".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(EngineError::InvalidConfig(
                "request timeout must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn page_fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..FetchSettings::for_pages()
        }
    }

    pub fn image_fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..FetchSettings::for_images()
        }
    }

    pub fn image_rules(&self) -> ImageRules {
        ImageRules::with_extensions(&self.allowed_extensions)
            .with_min_size(self.min_width, self.min_height)
    }
}

/// Wires scope rules, image rules, HTTP fetchers and the image processor
/// into a running crawler. Page and image downloads share one I/O runtime.
pub fn build_image_crawler(config: &CrawlConfig) -> Result<Crawler, EngineError> {
    config.validate()?;
    ensure_output_dir(&config.destination_root)?;

    let runtime = Arc::new(io_runtime()?);
    let pages = FetchClient::with_runtime(
        Arc::new(ReqwestFetcher::new(config.page_fetch_settings())?),
        Arc::clone(&runtime),
    );
    let images = FetchClient::with_runtime(
        Arc::new(ReqwestFetcher::new(config.image_fetch_settings())?),
        runtime,
    );

    let processor = ImageProcessor::new(
        Arc::new(config.image_rules()),
        images,
        config.destination_root.clone(),
    );
    Crawler::new(
        Arc::new(ScopeRules::new(config.scope.clone())),
        Arc::new(processor),
        pages,
        config.threads,
    )
}
