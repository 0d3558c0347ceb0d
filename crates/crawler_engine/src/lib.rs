//! Crawler engine: frontier, worker pool, fetching and image processing.
mod config;
mod crawler;
mod document;
mod fetch;
mod frontier;
mod persist;
mod processor;
mod types;

pub use config::{build_image_crawler, CrawlConfig};
pub use crawler::Crawler;
pub use document::{Document, ResolvedLink};
pub use fetch::{io_runtime, FetchClient, FetchSettings, Fetcher, ReqwestFetcher};
pub use frontier::{Frontier, TakeAll};
pub use persist::{
    destination_dir, ensure_output_dir, file_name_from_url, NoClobberWriter, PersistError,
    WriteOutcome,
};
pub use processor::{ImageProcessor, ProcessError, Processor};
pub use types::{
    ChannelEventSink, CrawlEvent, EngineError, EventSink, FailureKind, FetchError, FetchMetadata,
    FetchOutput,
};
