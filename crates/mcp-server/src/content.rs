//! Document content retrieval.
//!
//! The index stores metadata and snippets, not full bodies, so a result's
//! `url` is resolved back to the filesystem here. Resolution strips a literal
//! `file://` prefix only: no URL decoding, no symlink resolution, no
//! containment checks. Callers are trusted to supply URLs they previously
//! received from a search result.

use serde::Serialize;
use std::borrow::Cow;
use std::fs;
use std::io;

use crate::normalize::truncate_chars;

/// Returned content is cut to this many characters.
pub const CONTENT_MAX_CHARS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentEnvelope {
    pub url: String,
    pub filepath: String,
    pub content: String,
    pub truncated: bool,
}

pub fn strip_file_scheme(url: &str) -> &str {
    url.strip_prefix("file://").unwrap_or(url)
}

/// Read a document as text. Undecodable bytes are dropped rather than
/// failing the read.
pub fn read_document(url: &str) -> io::Result<ContentEnvelope> {
    let filepath = strip_file_scheme(url);
    let bytes = fs::read(filepath)?;
    let text = decode_ignoring_invalid(&bytes);
    let truncated = text.chars().count() > CONTENT_MAX_CHARS;

    Ok(ContentEnvelope {
        url: url.to_string(),
        filepath: filepath.to_string(),
        content: truncate_chars(&text, CONTENT_MAX_CHARS).to_string(),
        truncated,
    })
}

fn decode_ignoring_invalid(bytes: &[u8]) -> String {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(valid) => valid.to_string(),
        // Lossy decoding marks invalid sequences; drop the markers so bad
        // bytes vanish instead of surfacing as U+FFFD.
        Cow::Owned(replaced) => replaced
            .chars()
            .filter(|c| *c != char::REPLACEMENT_CHARACTER)
            .collect(),
    }
}
