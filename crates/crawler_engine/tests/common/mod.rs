#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use crawler_engine::{
    CrawlEvent, EventSink, FailureKind, FetchClient, FetchError, FetchOutput, Fetcher,
};
use url::Url;

/// In-memory fetcher that serves canned responses and counts requests.
#[derive(Default)]
pub struct StubFetcher {
    responses: HashMap<String, Result<FetchOutput, FetchError>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        let parsed = Url::parse(url).unwrap();
        let content_type = Some("text/html; charset=utf-8");
        let output = FetchOutput::from_bytes(&parsed, content_type, html.as_bytes().to_vec());
        self.responses.insert(parsed.to_string(), Ok(output));
        self
    }

    pub fn image(mut self, url: &str, bytes: Vec<u8>) -> Self {
        let parsed = Url::parse(url).unwrap();
        let output = FetchOutput::from_bytes(&parsed, Some("image/png"), bytes);
        self.responses.insert(parsed.to_string(), Ok(output));
        self
    }

    pub fn failing(mut self, url: &str, kind: FailureKind) -> Self {
        let parsed = Url::parse(url).unwrap();
        self.responses
            .insert(parsed.to_string(), Err(FetchError::new(kind, "stubbed failure")));
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        let key = Url::parse(url).unwrap().to_string();
        self.calls.lock().unwrap().get(&key).copied().unwrap_or(0)
    }

    pub fn into_client(self) -> (Arc<Self>, FetchClient) {
        let stub = Arc::new(self);
        let client = FetchClient::new(stub.clone()).expect("runtime");
        (stub, client)
    }
}

#[async_trait::async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchOutput, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default() += 1;
        self.responses
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| Err(FetchError::new(FailureKind::HttpStatus(404), "not found")))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<CrawlEvent>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<CrawlEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: CrawlEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Encodes a blank PNG of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::new(width, height);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}
