use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use tempfile::NamedTempFile;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("invalid file name {0:?}")]
    InvalidFileName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// The target already existed and was left untouched.
    AlreadyExists(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Written(path) | WriteOutcome::AlreadyExists(path) => path,
        }
    }
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes whole files into one directory, never replacing an existing file.
///
/// Content goes to a temp file first and is linked into place only if the
/// name is still free, so readers never observe a partial file.
pub struct NoClobberWriter {
    dir: PathBuf,
}

impl NoClobberWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<WriteOutcome, PersistError> {
        let reserved = matches!(filename, "" | "." | "..");
        if reserved || filename.contains(['/', '\\']) {
            return Err(PersistError::InvalidFileName(filename.to_string()));
        }
        let target = self.dir.join(filename);
        if target.exists() {
            return Ok(WriteOutcome::AlreadyExists(target));
        }
        ensure_output_dir(&self.dir)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;

        match tmp.persist_noclobber(&target) {
            Ok(_) => Ok(WriteOutcome::Written(target)),
            // Another worker won the race for this name.
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                Ok(WriteOutcome::AlreadyExists(target))
            }
            Err(err) => Err(PersistError::Io(err.error)),
        }
    }
}

/// Directory that mirrors `page` under `root`: `root/<host>/<path segments...>`.
///
/// Segments are percent-decoded; empty, `.` and `..` segments are dropped
/// and path separators inside a segment are replaced so the result never
/// escapes `root`.
pub fn destination_dir(root: &Path, page: &Url) -> PathBuf {
    let mut dir = root.join(sanitize_segment(page.host_str().unwrap_or("unknown-host")));
    if let Some(segments) = page.path_segments() {
        for segment in segments {
            let decoded = percent_decode(segment);
            if decoded.is_empty() || decoded == "." || decoded == ".." {
                continue;
            }
            dir.push(sanitize_segment(&decoded));
        }
    }
    dir
}

/// File name component of a resource URL (last path segment, decoded).
pub fn file_name_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.next_back()?;
    let decoded = percent_decode(last);
    if decoded.is_empty() || decoded == "." || decoded == ".." {
        return None;
    }
    Some(sanitize_segment(&decoded))
}

fn percent_decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}' => '_',
            c => c,
        })
        .collect()
}
