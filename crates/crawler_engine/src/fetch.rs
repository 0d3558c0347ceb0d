use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::{EngineError, FailureKind, FetchError, FetchMetadata, FetchOutput};

const USER_AGENT: &str = concat!("image-crawler/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Accepted media types; a trailing `/*` accepts any subtype. Empty accepts anything.
    pub allowed_content_types: Vec<String>,
    pub user_agent: String,
}

impl FetchSettings {
    /// Settings for HTML pages walked by the crawler.
    pub fn for_pages() -> Self {
        Self::default()
    }

    /// Settings for image downloads: any content type, larger size cap.
    ///
    /// Servers often label images `application/octet-stream`; the bytes are
    /// judged by decoding them instead.
    pub fn for_images() -> Self {
        Self {
            max_bytes: 25 * 1024 * 1024,
            allowed_content_types: Vec::new(),
            ..Self::default()
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            user_agent: USER_AGENT.to_string(),
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchOutput, FetchError>;
}

/// HTTP fetcher over one pooled `reqwest::Client`, shared by every worker.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = build_client(&settings)?;
        Ok(Self { client, settings })
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        if self.settings.allowed_content_types.is_empty() {
            return true;
        }
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings.allowed_content_types.iter().any(|allowed| {
            match allowed.strip_suffix("/*") {
                Some(top) => ct
                    .split_once('/')
                    .is_some_and(|(ct_top, _)| ct_top.eq_ignore_ascii_case(top)),
                None => allowed.eq_ignore_ascii_case(ct),
            }
        })
    }

    fn check_size(&self, actual: u64) -> Result<(), FetchError> {
        if actual > self.settings.max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes: self.settings.max_bytes,
                    actual: Some(actual),
                },
                "response too large",
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchOutput, FetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("unsupported scheme {}", url.scheme()),
            ));
        }
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            self.check_size(content_len)?;
        }

        let redirected = response.url() != url;
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            self.check_size(bytes.len() as u64 + chunk.len() as u64)?;
            bytes.extend_from_slice(&chunk);
        }

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url,
            redirected,
            content_type,
            byte_len: bytes.len() as u64,
        };

        Ok(FetchOutput { bytes, metadata })
    }
}

fn build_client(settings: &FetchSettings) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .user_agent(settings.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
        .build()
        .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

/// Blocking handle over an async [`Fetcher`] for use from worker threads.
///
/// Clones share the fetcher and the runtime. Must not be called from inside
/// an async context.
#[derive(Clone)]
pub struct FetchClient {
    fetcher: Arc<dyn Fetcher>,
    runtime: Arc<tokio::runtime::Runtime>,
}

impl FetchClient {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Result<Self, EngineError> {
        Ok(Self::with_runtime(fetcher, Arc::new(io_runtime()?)))
    }

    pub fn with_runtime(fetcher: Arc<dyn Fetcher>, runtime: Arc<tokio::runtime::Runtime>) -> Self {
        Self { fetcher, runtime }
    }

    pub fn fetch(&self, url: &Url) -> Result<FetchOutput, FetchError> {
        self.runtime.block_on(self.fetcher.fetch(url))
    }
}

/// Multi-threaded runtime that drives network I/O for all crawl workers.
pub fn io_runtime() -> Result<tokio::runtime::Runtime, EngineError> {
    tokio::runtime::Builder::new_multi_thread()
        .thread_name("crawler-io")
        .enable_all()
        .build()
        .map_err(EngineError::Runtime)
}
