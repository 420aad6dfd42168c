//! Plain text out of PDF and EPUB files.
//!
//! Extraction is best effort: a document that cannot be read yields `None`
//! and the attempt falls back to the built-in sentences.

use std::panic;
use std::path::Path;

use epub::doc::EpubDoc;

/// Text of every page, joined with spaces.
pub fn pdf_text(path: &Path) -> Option<String> {
    // pdf-extract panics on some malformed files instead of returning an error
    match panic::catch_unwind(|| pdf_extract::extract_text(path)) {
        Ok(Ok(text)) => Some(text),
        Ok(Err(err)) => {
            tracing::warn!(path = %path.display(), %err, "could not extract pdf text");
            None
        }
        Err(_) => {
            tracing::warn!(path = %path.display(), "pdf extraction panicked");
            None
        }
    }
}

/// Text of every spine document in reading order.
pub fn epub_text(path: &Path) -> Option<String> {
    let mut doc = match EpubDoc::new(path) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "could not open epub");
            return None;
        }
    };

    let mut chapters = Vec::new();
    loop {
        if let Some((content, _mime)) = doc.get_current_str() {
            chapters.push(strip_markup(&content));
        }
        if !doc.go_next() {
            break;
        }
    }

    let text = chapters.join(" ");
    if text.trim().is_empty() {
        tracing::warn!(path = %path.display(), "epub has no readable text");
        return None;
    }
    Some(text)
}

/// Drop tags from an (X)HTML document, keeping only the body's text.
///
/// Every tag becomes a space so block boundaries never glue words together;
/// `clean` collapses the extra whitespace later.
pub fn strip_markup(html: &str) -> String {
    let body = find_ignore_case(html, "<body").map_or(html, |at| &html[at..]);

    let mut out = String::with_capacity(body.len());
    let mut in_tag = false;
    for c in body.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    decode_entities(&out)
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}

fn decode_entities(text: &str) -> String {
    const ENTITIES: [(&str, &str); 6] = [
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&apos;", "'"),
        ("&#39;", "'"),
        ("&nbsp;", " "),
    ];
    let mut out = text.to_string();
    for (entity, plain) in ENTITIES {
        out = out.replace(entity, plain);
    }
    // last, so "&amp;lt;" stays "&lt;"
    out.replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::clean;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn strip_markup_keeps_body_text() {
        let html = "<html><head><title>Skip me</title></head>\
                    <body><h1>Title</h1><p>One <em>two</em></p><p>three</p></body></html>";
        assert_eq!(clean(&strip_markup(html)), "Title One two three");
    }

    #[test]
    fn strip_markup_without_body_keeps_everything() {
        assert_eq!(clean(&strip_markup("<p>a</p>b")), "a b");
    }

    #[test]
    fn strip_markup_decodes_entities() {
        assert_eq!(
            clean(&strip_markup("<body>Fish &amp; chips &lt;3 &amp;lt;</body>")),
            "Fish & chips <3 &lt;"
        );
    }

    #[test]
    fn broken_pdf_yields_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, "%PDF-1.4\nnot really a pdf").unwrap();
        assert_eq!(pdf_text(&path), None);
    }

    #[test]
    fn broken_epub_yields_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.epub");
        fs::write(&path, "not a zip").unwrap();
        assert_eq!(epub_text(&path), None);
    }
}
