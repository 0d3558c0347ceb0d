use crawler_rules::{ImageDimensions, ImageRules, ProcessorRules, DEFAULT_IMAGE_EXTENSIONS};
use url::Url;

fn url(raw: &str) -> Url {
    Url::parse(raw).expect("test url")
}

#[test]
fn extension_allow_list_filters_urls() {
    let rules = ImageRules::with_extensions([".png", ".jpg"]);

    assert!(rules.is_valid_uri(&url("https://x/a.png")));
    assert!(!rules.is_valid_uri(&url("https://x/a.gif")));
}

#[test]
fn extensions_match_case_insensitively_and_without_dot() {
    let rules = ImageRules::new().allow_extension("JPEG");

    assert!(rules.is_valid_uri(&url("https://x/photo.JpEg")));
}

#[test]
fn empty_allow_list_admits_nothing() {
    let rules = ImageRules::new();
    assert!(!rules.is_valid_uri(&url("https://x/a.png")));
}

#[test]
fn each_image_is_admitted_once() {
    let rules = ImageRules::with_extensions(DEFAULT_IMAGE_EXTENSIONS);

    assert!(rules.is_valid_uri(&url("https://x/img/a.jpg")));
    assert!(!rules.is_valid_uri(&url("https://x/img/a.jpg")));
    assert!(rules.is_valid_uri(&url("https://x/img/b.jpg")));
}

#[test]
fn fragment_bearing_image_urls_are_rejected() {
    let rules = ImageRules::with_extensions([".png"]);
    assert!(!rules.is_valid_uri(&url("https://x/a.png#zoom")));
}

#[test]
fn dimensions_must_exceed_minimum_on_both_axes() {
    let rules = ImageRules::with_extensions([".png"]).with_min_size(300, 200);

    assert!(!rules.is_valid(&ImageDimensions::new(300, 500)));
    assert!(!rules.is_valid(&ImageDimensions::new(500, 200)));
    assert!(rules.is_valid(&ImageDimensions::new(301, 201)));
}

#[test]
fn zero_minimum_still_rejects_empty_images() {
    let rules = ImageRules::with_extensions([".png"]);

    assert!(!rules.is_valid(&ImageDimensions::new(0, 10)));
    assert!(rules.is_valid(&ImageDimensions::new(1, 1)));
}
