//! Parsed HTML pages and the references they carry.
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use engine_logging::engine_warn;
use scraper::{Html, Selector};
use url::Url;

use crate::FetchOutput;

/// A fetched page, parsed and ready for link extraction.
///
/// `scraper::Html` is not `Send`, so a document never leaves the worker
/// thread that parsed it.
pub struct Document {
    url: Url,
    html: Html,
    encoding: &'static Encoding,
}

/// A reference found on a page, resolved against the page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub url: Url,
}

impl Document {
    /// Decodes `output` (BOM, then Content-Type charset, then detection) and parses it.
    ///
    /// Undecodable byte sequences become U+FFFD; the rest of the page, links
    /// included, stays usable.
    pub fn parse(url: Url, output: &FetchOutput) -> Self {
        let encoding = detect_encoding(&output.bytes, output.metadata.content_type.as_deref());
        let (text, _, had_errors) = encoding.decode(&output.bytes);
        if had_errors {
            engine_warn!("{} is not valid {}; decoding lossily", url, encoding.name());
        }
        Self {
            url,
            html: Html::parse_document(&text),
            encoding,
        }
    }

    pub fn encoding_label(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn title(&self) -> Option<String> {
        let sel = Selector::parse("title").ok()?;
        self.html
            .select(&sel)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Every `<a href>` on the page.
    pub fn hyperlinks(&self) -> Vec<ResolvedLink> {
        self.resolve_attr("a[href]", "href")
    }

    /// Every `<img src>` on the page.
    pub fn image_sources(&self) -> Vec<ResolvedLink> {
        self.resolve_attr("img[src]", "src")
    }

    fn resolve_attr(&self, selector: &str, attr: &str) -> Vec<ResolvedLink> {
        let Ok(sel) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.html
            .select(&sel)
            .filter_map(|element| element.value().attr(attr))
            .filter_map(|raw| match self.url.join(raw.trim()) {
                Ok(url) => Some(ResolvedLink { url }),
                Err(err) => {
                    engine_warn!("Skipping malformed reference {:?} on {}: {}", raw, self.url, err);
                    None
                }
            })
            .collect()
    }
}

fn detect_encoding(bytes: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    if let Some(encoding) = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_parameter_is_case_insensitive() {
        assert_eq!(charset_param("text/html; Charset=\"ISO-8859-1\""), Some("ISO-8859-1"));
        assert_eq!(charset_param("text/html"), None);
    }

    #[test]
    fn content_type_charset_drives_decoding() {
        let url = Url::parse("https://site.test/").unwrap();
        let output = FetchOutput::from_bytes(
            &url,
            Some("text/html; charset=windows-1252"),
            b"<title>caf\xe9</title>".to_vec(),
        );
        let doc = Document::parse(url, &output);
        assert_eq!(doc.title().as_deref(), Some("café"));
        assert_eq!(doc.encoding_label(), "windows-1252");
    }
}
