use std::collections::HashSet;

use url::Url;

use crate::{has_fragment, AdmissionLedger, ProcessorRules};

/// Extensions accepted when no explicit allow-list is configured.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".bmp"];

/// Pixel size of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Processor rules for image downloads: extension allow-list, one download
/// attempt per URL, and a strict minimum size.
#[derive(Debug, Default)]
pub struct ImageRules {
    allowed_extensions: HashSet<String>,
    min_width: u32,
    min_height: u32,
    processed: AdmissionLedger,
}

impl ImageRules {
    /// Rules with an empty allow-list; nothing is admitted until extensions are added.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extensions
            .into_iter()
            .fold(Self::new(), |rules, ext| rules.allow_extension(ext.as_ref()))
    }

    /// Adds an extension such as `.png`. A missing leading dot is supplied.
    pub fn allow_extension(mut self, extension: &str) -> Self {
        let ext = extension.trim().to_ascii_lowercase();
        if ext.is_empty() {
            return self;
        }
        let ext = if ext.starts_with('.') {
            ext
        } else {
            format!(".{ext}")
        };
        self.allowed_extensions.insert(ext);
        self
    }

    pub fn with_min_size(mut self, min_width: u32, min_height: u32) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    fn has_allowed_extension(&self, url: &Url) -> bool {
        extension_of(url)
            .map(|ext| self.allowed_extensions.contains(&ext))
            .unwrap_or(false)
    }
}

impl ProcessorRules<ImageDimensions> for ImageRules {
    fn is_valid_uri(&self, url: &Url) -> bool {
        if has_fragment(url) || !self.has_allowed_extension(url) {
            return false;
        }
        self.processed.admit(url.as_str())
    }

    fn is_valid(&self, content: &ImageDimensions) -> bool {
        content.width > self.min_width && content.height > self.min_height
    }
}

/// Lower-cased extension (with dot) of the last path segment, if any.
fn extension_of(url: &Url) -> Option<String> {
    let file = url.path_segments()?.next_back()?;
    let dot = file.rfind('.')?;
    if dot + 1 == file.len() {
        return None;
    }
    Some(file[dot..].to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext(raw: &str) -> Option<String> {
        extension_of(&Url::parse(raw).unwrap())
    }

    #[test]
    fn extension_ignores_query_and_directories() {
        assert_eq!(ext("https://x/a.png?size=large"), Some(".png".into()));
        assert_eq!(ext("https://x/dir.d/file"), None);
        assert_eq!(ext("https://x/photo.JPG"), Some(".jpg".into()));
        assert_eq!(ext("https://x/trailing."), None);
        assert_eq!(ext("https://x/"), None);
    }
}
