use crawler_engine::{Document, FetchOutput};
use pretty_assertions::assert_eq;
use url::Url;

fn parse(base: &str, html: &str) -> Document {
    let url = Url::parse(base).unwrap();
    let output =
        FetchOutput::from_bytes(&url, Some("text/html; charset=utf-8"), html.as_bytes().to_vec());
    Document::parse(url, &output)
}

fn urls(links: Vec<crawler_engine::ResolvedLink>) -> Vec<String> {
    links.into_iter().map(|link| link.url.to_string()).collect()
}

#[test]
fn hyperlinks_resolve_against_page_url() {
    let doc = parse(
        "https://site.test/docs/intro",
        r#"<a href="next">Next</a><a href="/top">Top</a><a href="https://other.test/x">Out</a>"#,
    );

    assert_eq!(
        urls(doc.hyperlinks()),
        vec![
            "https://site.test/docs/next",
            "https://site.test/top",
            "https://other.test/x",
        ]
    );
}

#[test]
fn fragment_links_are_kept_for_the_rules_to_judge() {
    let doc = parse("https://site.test/page", "<a href=\"#section\">Jump</a>");
    assert_eq!(urls(doc.hyperlinks()), vec!["https://site.test/page#section"]);
}

#[test]
fn malformed_references_are_skipped_individually() {
    let doc = parse(
        "https://site.test/",
        r#"<a href="http://[bad">Broken</a><a href="/ok">Fine</a>"#,
    );
    assert_eq!(urls(doc.hyperlinks()), vec!["https://site.test/ok"]);
}

#[test]
fn image_sources_are_collected_separately() {
    let doc = parse(
        "https://site.test/gallery/",
        r#"<img src="a.png"><img alt="no source"><a href="b.png">b</a>"#,
    );
    assert_eq!(urls(doc.image_sources()), vec!["https://site.test/gallery/a.png"]);
    assert_eq!(urls(doc.hyperlinks()), vec!["https://site.test/gallery/b.png"]);
}

#[test]
fn title_is_trimmed() {
    let doc = parse("https://site.test/", "<html><head><title>  Home </title></head></html>");
    assert_eq!(doc.title().as_deref(), Some("Home"));
}

#[test]
fn invalid_bytes_are_replaced_and_links_survive() {
    let url = Url::parse("https://site.test/").unwrap();
    let mut body = b"<p>caf".to_vec();
    body.push(0xff);
    body.extend_from_slice(b"</p><a href=\"/page2\">Next</a>");
    let output = FetchOutput::from_bytes(&url, Some("text/html; charset=utf-8"), body);

    let doc = Document::parse(url, &output);

    assert_eq!(doc.encoding_label(), "UTF-8");
    assert_eq!(urls(doc.hyperlinks()), vec!["https://site.test/page2"]);
}
