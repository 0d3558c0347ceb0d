use std::fs;
use std::path::PathBuf;

use crawler_engine::{
    destination_dir, ensure_output_dir, file_name_from_url, NoClobberWriter, WriteOutcome,
};
use tempfile::TempDir;
use url::Url;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn existing_files_are_never_overwritten() {
    let temp = TempDir::new().unwrap();
    let writer = NoClobberWriter::new(temp.path().join("nested"));

    let first = writer.write("a.jpg", b"first").unwrap();
    assert!(matches!(first, WriteOutcome::Written(_)));
    assert_eq!(fs::read(first.path()).unwrap(), b"first");

    let second = writer.write("a.jpg", b"second").unwrap();
    assert_eq!(second, WriteOutcome::AlreadyExists(first.path().to_path_buf()));
    assert_eq!(fs::read(second.path()).unwrap(), b"first");
}

#[test]
fn writer_refuses_names_with_separators() {
    let temp = TempDir::new().unwrap();
    let writer = NoClobberWriter::new(temp.path().to_path_buf());

    assert!(writer.write("../escape.png", b"x").is_err());
    assert!(writer.write("", b"x").is_err());
}

#[test]
fn writer_fails_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = NoClobberWriter::new(file_path);
    assert!(writer.write("a.png", b"data").is_err());
}

#[test]
fn destination_mirrors_page_host_and_path() {
    let root = PathBuf::from("/out");
    let page = Url::parse("https://Example.com/fun/stuff/").unwrap();

    assert_eq!(
        destination_dir(&root, &page),
        PathBuf::from("/out/example.com/fun/stuff")
    );
}

#[test]
fn destination_drops_empty_segments_and_decodes() {
    let root = PathBuf::from("/out");
    let page = Url::parse("https://site.test/a%20b//c").unwrap();

    assert_eq!(
        destination_dir(&root, &page),
        PathBuf::from("/out/site.test/a b/c")
    );
}

#[test]
fn file_name_comes_from_last_segment() {
    let url = Url::parse("https://site.test/img/cat%20photo.jpg?size=2").unwrap();
    assert_eq!(file_name_from_url(&url).as_deref(), Some("cat photo.jpg"));

    let dir = Url::parse("https://site.test/img/").unwrap();
    assert_eq!(file_name_from_url(&dir), None);
}
