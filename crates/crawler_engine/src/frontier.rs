//! Shared queue of URLs awaiting a fetch attempt.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crawler_rules::CrawlRules;
use crossbeam_channel::{select, unbounded, Receiver, Sender};
use engine_logging::engine_debug;
use url::Url;

/// Unbounded, blocking multi-producer/multi-consumer frontier guarded by
/// crawl rules.
///
/// Besides the queue itself the frontier counts outstanding work: a URL is
/// outstanding from admission until a worker calls [`Frontier::complete`]
/// for it. Workers feed discovered links back before completing, so a count
/// of zero means the crawl has nothing left to discover.
pub struct Frontier<D> {
    rules: Arc<dyn CrawlRules<D>>,
    tx: Sender<Url>,
    rx: Receiver<Url>,
    shutdown_tx: Mutex<Option<Sender<()>>>,
    shutdown_rx: Receiver<()>,
    outstanding: Mutex<usize>,
    idle: Condvar,
}

impl<D> Frontier<D> {
    pub fn new(rules: Arc<dyn CrawlRules<D>>) -> Self {
        let (tx, rx) = unbounded();
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(0);
        Self {
            rules,
            tx,
            rx,
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            shutdown_rx,
            outstanding: Mutex::new(0),
            idle: Condvar::new(),
        }
    }

    pub fn rules(&self) -> &dyn CrawlRules<D> {
        self.rules.as_ref()
    }

    /// Queues `url` if the rules admit it. Returns whether it was queued.
    pub fn add(&self, url: Url) -> bool {
        if self.is_closed() || !self.rules.is_valid_uri(&url) {
            return false;
        }
        *self.lock_outstanding() += 1;
        engine_debug!("Add: {}", url);
        if self.tx.send(url).is_err() {
            self.complete();
            return false;
        }
        true
    }

    /// Blocking sequence of queued URLs. Ends only once the frontier is closed.
    pub fn take_all(&self) -> TakeAll<'_, D> {
        TakeAll { frontier: self }
    }

    /// Marks one dequeued URL as fully handled.
    pub fn complete(&self) {
        let mut outstanding = self.lock_outstanding();
        *outstanding = outstanding.saturating_sub(1);
        if *outstanding == 0 {
            self.idle.notify_all();
        }
    }

    /// URLs admitted but not yet completed.
    pub fn outstanding(&self) -> usize {
        *self.lock_outstanding()
    }

    /// URLs sitting in the queue, not yet taken by a worker.
    pub fn queued(&self) -> usize {
        self.rx.len()
    }

    /// Blocks until no work is outstanding or `timeout` elapses.
    /// Returns `true` if the frontier drained.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut outstanding = self.lock_outstanding();
        while *outstanding > 0 {
            if self.is_closed() {
                return false;
            }
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                return false;
            };
            outstanding = self
                .idle
                .wait_timeout(outstanding, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }

    /// Stops accepting URLs and releases every consumer blocked in `take_all`.
    /// URLs still queued are abandoned.
    pub fn close(&self) {
        self.shutdown_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        // A closed frontier never drains; release idle waiters.
        let _guard = self.lock_outstanding();
        self.idle.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn lock_outstanding(&self) -> std::sync::MutexGuard<'_, usize> {
        self.outstanding.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct TakeAll<'a, D> {
    frontier: &'a Frontier<D>,
}

impl<D> Iterator for TakeAll<'_, D> {
    type Item = Url;

    fn next(&mut self) -> Option<Url> {
        let frontier = self.frontier;
        if frontier.is_closed() {
            return None;
        }
        select! {
            recv(frontier.rx) -> url => url.ok(),
            recv(frontier.shutdown_rx) -> _ => None,
        }
    }
}
