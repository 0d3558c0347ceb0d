use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crawler_rules::CrawlRules;
use engine_logging::{engine_debug, engine_error, engine_info};
use url::Url;

use crate::document::Document;
use crate::fetch::FetchClient;
use crate::frontier::Frontier;
use crate::processor::Processor;
use crate::{ChannelEventSink, CrawlEvent, EngineError, EventSink};

/// Fixed-size pool of crawl workers draining a shared frontier.
///
/// Workers start immediately and block until [`Crawler::start`] seeds the
/// frontier. The pool never stops by itself: when nothing is left to
/// discover every worker simply waits. Use [`Crawler::wait_idle`] to detect
/// that state and [`Crawler::stop`] (or drop) to release the threads.
pub struct Crawler {
    frontier: Arc<Frontier<Document>>,
    workers: Vec<JoinHandle<()>>,
    event_rx: mpsc::Receiver<CrawlEvent>,
}

impl Crawler {
    pub fn new(
        rules: Arc<dyn CrawlRules<Document>>,
        processor: Arc<dyn Processor>,
        client: FetchClient,
        threads: usize,
    ) -> Result<Self, EngineError> {
        if threads == 0 {
            return Err(EngineError::InvalidConfig(
                "thread count must be positive".to_string(),
            ));
        }

        let frontier = Arc::new(Frontier::new(rules));
        let (event_tx, event_rx) = mpsc::channel();
        let mut workers = Vec::with_capacity(threads);

        for id in 0..threads {
            let worker = Worker {
                id,
                frontier: Arc::clone(&frontier),
                processor: Arc::clone(&processor),
                client: client.clone(),
                events: ChannelEventSink::new(event_tx.clone()),
            };
            let spawned = thread::Builder::new()
                .name(format!("crawl-worker-{id}"))
                .spawn(move || worker.run());
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    frontier.close();
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(EngineError::Spawn(err));
                }
            }
        }

        engine_info!("Crawler running with {} workers", threads);
        Ok(Self {
            frontier,
            workers,
            event_rx,
        })
    }

    /// Seeds the crawl. Returns `false` if the rules refused the URL.
    pub fn start(&self, seed: Url) -> bool {
        self.frontier.add(seed)
    }

    pub fn frontier(&self) -> &Frontier<Document> {
        &self.frontier
    }

    /// Blocks until every admitted URL has been handled, or `timeout` elapses.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.frontier.wait_idle(timeout)
    }

    pub fn try_recv(&self) -> Option<CrawlEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Closes the frontier and joins the workers. Queued URLs are dropped;
    /// a worker in the middle of a page finishes that page first.
    pub fn stop(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.frontier.close();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                engine_error!("Crawl worker exited abnormally");
            }
        }
        engine_info!("Crawler stopped");
    }
}

impl Drop for Crawler {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Worker {
    id: usize,
    frontier: Arc<Frontier<Document>>,
    processor: Arc<dyn Processor>,
    client: FetchClient,
    events: ChannelEventSink,
}

impl Worker {
    fn run(self) {
        engine_logging::set_worker_id(self.id);
        engine_debug!("Worker started");
        for url in self.frontier.take_all() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.crawl(&url)));
            if outcome.is_err() {
                engine_error!("Crawling {} panicked; page abandoned", url);
                self.events.emit(CrawlEvent::PageFailed {
                    url: url.to_string(),
                    reason: "worker panicked".to_string(),
                });
            }
            self.frontier.complete();
        }
        engine_debug!("Worker stopped");
    }

    fn crawl(&self, url: &Url) {
        engine_debug!("Crawling: {}", url);

        let output = match self.client.fetch(url) {
            Ok(output) => output,
            Err(err) => {
                engine_error!("Fetch {} failed: {}", url, err);
                self.fail(url, err.to_string());
                return;
            }
        };

        let document = Document::parse(url.clone(), &output);

        if !self.frontier.rules().is_valid_page(&document) {
            engine_debug!("Page rejected: {}", url);
            self.events.emit(CrawlEvent::PageRejected {
                url: url.to_string(),
            });
            return;
        }

        self.processor.process(url, &document, &self.events);

        let links = document.hyperlinks();
        let found = links.len();
        let admitted = links
            .into_iter()
            .filter(|link| self.frontier.add(link.url.clone()))
            .count();

        self.events.emit(CrawlEvent::PageCrawled {
            url: url.to_string(),
            links: found,
            admitted,
        });
    }

    fn fail(&self, url: &Url, reason: String) {
        self.events.emit(CrawlEvent::PageFailed {
            url: url.to_string(),
            reason,
        });
    }
}
