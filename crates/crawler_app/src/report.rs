use std::fmt;

use crawler_engine::{CrawlEvent, Crawler};
use engine_logging::{engine_info, engine_warn};

/// Running totals over the crawl event stream.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages_crawled: usize,
    pub pages_failed: usize,
    pub pages_rejected: usize,
    pub links_admitted: usize,
    pub images_saved: usize,
    pub images_existing: usize,
    pub images_rejected: usize,
    pub images_failed: usize,
}

impl CrawlSummary {
    pub fn record(&mut self, event: &CrawlEvent) {
        match event {
            CrawlEvent::PageCrawled { admitted, .. } => {
                self.pages_crawled += 1;
                self.links_admitted += admitted;
            }
            CrawlEvent::PageFailed { url, reason } => {
                engine_warn!("Page {} failed: {}", url, reason);
                self.pages_failed += 1;
            }
            CrawlEvent::PageRejected { .. } => self.pages_rejected += 1,
            CrawlEvent::ImageSaved { url, path } => {
                engine_info!("Saved {} -> {}", url, path.display());
                self.images_saved += 1;
            }
            CrawlEvent::ImageExists { .. } => self.images_existing += 1,
            CrawlEvent::ImageRejected { .. } => self.images_rejected += 1,
            CrawlEvent::ImageFailed { .. } => self.images_failed += 1,
        }
    }

    /// Records every event the crawler has produced so far.
    pub fn drain(&mut self, crawler: &Crawler) {
        while let Some(event) = crawler.try_recv() {
            self.record(&event);
        }
    }
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "pages: {} crawled, {} failed, {} rejected ({} links queued)",
            self.pages_crawled, self.pages_failed, self.pages_rejected, self.links_admitted
        )?;
        write!(
            f,
            "images: {} saved, {} already present, {} too small, {} failed",
            self.images_saved, self.images_existing, self.images_rejected, self.images_failed
        )
    }
}
