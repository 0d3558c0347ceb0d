use url::Url;

use crate::{has_fragment, AdmissionLedger, CrawlRules};

/// Crawl rules that confine the crawl to URLs starting with a fixed prefix.
///
/// The prefix is matched literally against the serialized URL, ignoring
/// ASCII case. No normalisation is applied to either side, so a scope of
/// `https://example.com/docs` also admits `https://example.com/docs-old`.
#[derive(Debug)]
pub struct ScopeRules {
    scope: String,
    crawled: AdmissionLedger,
}

impl ScopeRules {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            crawled: AdmissionLedger::new(),
        }
    }

    /// Number of URLs admitted so far.
    pub fn admitted(&self) -> usize {
        self.crawled.len()
    }

    fn in_scope(&self, url: &Url) -> bool {
        let absolute = url.as_str();
        absolute.len() >= self.scope.len()
            && absolute.as_bytes()[..self.scope.len()].eq_ignore_ascii_case(self.scope.as_bytes())
    }
}

impl<D> CrawlRules<D> for ScopeRules {
    fn is_valid_uri(&self, url: &Url) -> bool {
        if has_fragment(url) || !self.in_scope(url) {
            return false;
        }
        self.crawled.admit(url.as_str())
    }

    fn is_valid_page(&self, _document: &D) -> bool {
        true
    }
}
