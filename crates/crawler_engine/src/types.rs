use std::fmt;
use std::path::PathBuf;

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    /// The response came from a different URL than the one requested.
    pub redirected: bool,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

impl FetchOutput {
    /// Builds an output for bytes that did not come over the wire (tests, local sources).
    pub fn from_bytes(url: &Url, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url: url.to_string(),
            redirected: false,
            content_type: content_type.map(str::to_string),
            byte_len: bytes.len() as u64,
        };
        Self { bytes, metadata }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Observable progress of a crawl, one event per work item outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    /// Page fetched and processed; `links` hyperlinks found, `admitted` of them queued.
    PageCrawled {
        url: String,
        links: usize,
        admitted: usize,
    },
    /// Fetch or decode failed; the page is abandoned.
    PageFailed { url: String, reason: String },
    /// Page fetched but refused by the crawl rules.
    PageRejected { url: String },
    ImageSaved { url: String, path: PathBuf },
    /// Valid image whose destination file was already present.
    ImageExists { url: String, path: PathBuf },
    /// Image downloaded but below the minimum size.
    ImageRejected { url: String },
    ImageFailed { url: String, reason: String },
}

/// Receives crawl events from workers and processors.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: CrawlEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<CrawlEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<CrawlEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: CrawlEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to start io runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error(transparent)]
    Persist(#[from] crate::PersistError),
    #[error("failed to build http client: {0}")]
    Fetch(#[from] FetchError),
}
