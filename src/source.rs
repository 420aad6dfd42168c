use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::document;

/// Supplies raw text for an attempt. `None` means "use the fallback sentences".
pub trait TextSource {
    fn fetch(&mut self) -> Option<String>;
}

/// No external text at all; every attempt uses a fallback sentence.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSource;

impl TextSource for NoSource {
    fn fetch(&mut self) -> Option<String> {
        None
    }
}

/// The same fixed string every attempt.
#[derive(Debug, Clone)]
pub struct StaticSource(pub String);

impl TextSource for StaticSource {
    fn fetch(&mut self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Text imported from a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

impl TextSource for FileSource {
    fn fetch(&mut self) -> Option<String> {
        if has_extension(&self.path, "pdf") {
            return document::pdf_text(&self.path);
        }
        if has_extension(&self.path, "epub") {
            return document::epub_text(&self.path);
        }
        match fs::read(&self.path) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "could not read import file");
                None
            }
        }
    }
}

pub const WIKIPEDIA_RANDOM_SUMMARY: &str =
    "https://en.wikipedia.org/api/rest_v1/page/random/summary";

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default)]
    extract: String,
}

/// Pull the plain-text extract out of a page summary, rejecting anything that
/// is not plain Latin text.
///
/// Newlines and other ASCII whitespace pass the Latin check even though they
/// sit outside 0x20..=0x7E; `clean` drops them before the text is typed.
pub fn parse_summary(body: &str) -> Option<String> {
    let summary: PageSummary = serde_json::from_str(body).ok()?;
    let latin = summary
        .extract
        .chars()
        .all(|c| c.is_ascii_whitespace() || crate::text::is_printable_ascii(c));
    if summary.extract.trim().is_empty() || !latin {
        tracing::info!("wikipedia summary rejected, using fallback text");
        return None;
    }
    Some(summary.extract)
}

/// Random English Wikipedia summary.
#[derive(Debug, Clone)]
pub struct WikipediaSource {
    url: String,
}

impl WikipediaSource {
    pub fn new() -> Self {
        Self {
            url: WIKIPEDIA_RANDOM_SUMMARY.to_string(),
        }
    }
}

impl Default for WikipediaSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for WikipediaSource {
    fn fetch(&mut self) -> Option<String> {
        let body = fetch_url(&self.url)?;
        parse_summary(&body)
    }
}

#[cfg(feature = "network")]
fn fetch_url(url: &str) -> Option<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .user_agent(concat!("typing-jail/", env!("CARGO_PKG_VERSION")))
        .build()
        .ok()?;
    let response = match client.get(url).send() {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(%err, "wikipedia request failed");
            return None;
        }
    };
    if response.status().is_success() {
        response.text().ok()
    } else {
        tracing::warn!(status = %response.status(), "wikipedia request rejected");
        None
    }
}

#[cfg(not(feature = "network"))]
fn fetch_url(_url: &str) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_source_reads_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.txt");
        fs::write(&path, "Call me Ishmael.").unwrap();
        assert_eq!(FileSource::new(&path).fetch().as_deref(), Some("Call me Ishmael."));
    }

    #[test]
    fn file_source_missing_file() {
        let dir = tempdir().unwrap();
        assert_eq!(FileSource::new(dir.path().join("nope.txt")).fetch(), None);
    }

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn file_source_extracts_pdf_text() {
        let text = FileSource::new(fixture("sample.pdf")).fetch().unwrap();
        assert!(text.contains("liquor jugs"), "got {text:?}");
    }

    #[test]
    fn file_source_extracts_epub_text() {
        let text = FileSource::new(fixture("sample.epub")).fetch().unwrap();
        let text = crate::text::clean(&text);
        assert!(text.contains("The quick brown fox jumps over the lazy dog."));
        assert!(text.contains("Fish & chips."));
        assert!(text.contains("Sphinx of black quartz, judge my vow."));
        assert!(!text.contains("margin"));
    }

    #[test]
    fn document_extension_is_case_insensitive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.PDF");
        fs::copy(fixture("sample.pdf"), &path).unwrap();
        assert!(FileSource::new(&path).fetch().is_some());
    }

    #[test]
    fn unreadable_document_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.epub");
        fs::write(&path, "%PDF-1.4").unwrap();
        assert_eq!(FileSource::new(&path).fetch(), None);
    }

    #[test]
    fn parse_summary_extracts_text() {
        let body = r#"{"title":"Rust","extract":"Rust is a language.\nIt is fast."}"#;
        assert_eq!(
            parse_summary(body).as_deref(),
            Some("Rust is a language.\nIt is fast.")
        );
    }

    #[test]
    fn parse_summary_rejects_non_latin() {
        let body = r#"{"extract":"Zürich is a city."}"#;
        assert_eq!(parse_summary(body), None);
    }

    #[test]
    fn parse_summary_rejects_garbage() {
        assert_eq!(parse_summary("<html>"), None);
        assert_eq!(parse_summary(r#"{"title":"x"}"#), None);
    }

    #[test]
    fn static_and_empty_sources() {
        assert_eq!(StaticSource("abc".into()).fetch().as_deref(), Some("abc"));
        assert_eq!(NoSource.fetch(), None);
    }
}
