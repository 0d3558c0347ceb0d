use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crawler_rules::{ImageDimensions, ProcessorRules};
use engine_logging::{engine_debug, engine_warn};
use image::ImageReader;
use url::Url;

use crate::document::{Document, ResolvedLink};
use crate::fetch::FetchClient;
use crate::persist::{
    destination_dir, file_name_from_url, NoClobberWriter, PersistError, WriteOutcome,
};
use crate::{CrawlEvent, EventSink, FetchError};

/// Per-page side effect run by crawl workers on every accepted page.
///
/// Implementations own their failures: nothing they do may abort the
/// calling worker or the rest of the page.
pub trait Processor: Send + Sync {
    fn process(&self, url: &Url, document: &Document, events: &dyn EventSink);
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("not a decodable image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("url has no file name")]
    NoFileName,
    #[error("could not save image: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ImageOutcome {
    Saved(PathBuf),
    Exists(PathBuf),
    TooSmall(ImageDimensions),
}

/// Downloads images referenced by a page into a directory tree mirroring
/// the page URL: `destination/<host>/<page path>/<image file name>`.
pub struct ImageProcessor {
    rules: Arc<dyn ProcessorRules<ImageDimensions>>,
    client: FetchClient,
    destination: PathBuf,
}

impl ImageProcessor {
    pub fn new(
        rules: Arc<dyn ProcessorRules<ImageDimensions>>,
        client: FetchClient,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            rules,
            client,
            destination: destination.into(),
        }
    }

    fn handle_candidate(&self, link: &ResolvedLink, folder: &Path, events: &dyn EventSink) {
        if !self.rules.is_valid_uri(&link.url) {
            return;
        }
        let url = link.url.to_string();
        engine_debug!("DownloadImage: {}", url);
        match self.download(&link.url, folder) {
            Ok(ImageOutcome::Saved(path)) => {
                engine_debug!("Saved {} to {:?}", url, path);
                events.emit(CrawlEvent::ImageSaved { url, path });
            }
            Ok(ImageOutcome::Exists(path)) => {
                events.emit(CrawlEvent::ImageExists { url, path });
            }
            Ok(ImageOutcome::TooSmall(dims)) => {
                engine_debug!("Rejected {} at {}x{}", url, dims.width, dims.height);
                events.emit(CrawlEvent::ImageRejected { url });
            }
            Err(err) => {
                engine_warn!("Image {} failed: {}", url, err);
                events.emit(CrawlEvent::ImageFailed {
                    url,
                    reason: err.to_string(),
                });
            }
        }
    }

    fn download(&self, url: &Url, folder: &Path) -> Result<ImageOutcome, ProcessError> {
        let output = self.client.fetch(url)?;
        let dims = image_dimensions(&output.bytes)?;
        if !self.rules.is_valid(&dims) {
            return Ok(ImageOutcome::TooSmall(dims));
        }
        let name = file_name_from_url(url).ok_or(ProcessError::NoFileName)?;
        let writer = NoClobberWriter::new(folder.to_path_buf());
        Ok(match writer.write(&name, &output.bytes)? {
            WriteOutcome::Written(path) => ImageOutcome::Saved(path),
            WriteOutcome::AlreadyExists(path) => ImageOutcome::Exists(path),
        })
    }
}

impl Processor for ImageProcessor {
    fn process(&self, url: &Url, document: &Document, events: &dyn EventSink) {
        engine_debug!("Process: {}", url);
        let folder = destination_dir(&self.destination, url);

        // Images may be embedded or merely linked; the rules decide which
        // references are worth a download.
        for link in document.image_sources().iter().chain(document.hyperlinks().iter()) {
            self.handle_candidate(link, &folder, events);
        }
    }
}

/// Reads the pixel size from the image header without decoding pixels.
fn image_dimensions(bytes: &[u8]) -> Result<ImageDimensions, image::ImageError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(ImageDimensions::new(width, height))
}
