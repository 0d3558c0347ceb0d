use url::Url;

/// Decides which pages the crawler may visit.
///
/// `D` is the parsed document type handed out by the fetch layer.
pub trait CrawlRules<D>: Send + Sync {
    /// Admits `url` for crawling. A `true` result is final: the URL is
    /// recorded before returning and will be refused on every later call.
    fn is_valid_uri(&self, url: &Url) -> bool;

    /// Stateless check on a fetched page before it is processed.
    fn is_valid_page(&self, document: &D) -> bool;
}

/// Decides which resources a processor may download and keep.
///
/// `C` is the decoded content type (for images, their dimensions).
pub trait ProcessorRules<C>: Send + Sync {
    /// Admits `url` for download, recording it on success.
    fn is_valid_uri(&self, url: &Url) -> bool;

    /// Stateless check on downloaded content.
    fn is_valid(&self, content: &C) -> bool;
}

/// True when the URL carries a fragment, including an empty one (`x#`).
pub fn has_fragment(url: &Url) -> bool {
    url.fragment().is_some()
}
