//! Raw hit normalization.
//!
//! Maps one engine hit into the stable JSON shape the tools return. The
//! readable timestamp is recomputed from the raw token on every call, never
//! cached, and a token that fails to decode is shown verbatim.

use chrono::{Local, TimeZone};
use recoll_engine::RawDocHit;
use serde::Serialize;

/// Previews are cut to this many characters (a prefix cut, not word aware).
pub const PREVIEW_MAX_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentHit {
    pub filename: String,
    pub url: String,
    pub mimetype: String,
    pub size: u64,
    /// Engine-native timestamp token, verbatim.
    pub mtime: String,
    /// `YYYY-MM-DD HH:MM:SS`, derived from `mtime`.
    pub mtime_readable: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

pub fn normalize_hit(raw: &RawDocHit, include_preview: bool) -> DocumentHit {
    let preview = if include_preview {
        raw.abstract_text
            .as_deref()
            .map(|text| truncate_chars(text, PREVIEW_MAX_CHARS).to_string())
    } else {
        None
    };

    DocumentHit {
        filename: raw.filename.clone(),
        url: raw.url.clone(),
        mimetype: raw.mimetype.clone(),
        size: raw.fbytes,
        mtime: raw.mtime.clone(),
        mtime_readable: readable_mtime(&raw.mtime),
        preview,
    }
}

/// Decode the engine's timestamp token: one marker byte, then decimal epoch
/// seconds. The marker is only skipped when it is not a digit, so a bare
/// epoch value also decodes. Any failure falls back to the raw token.
fn readable_mtime(token: &str) -> String {
    let digits = token
        .strip_prefix(|c: char| !c.is_ascii_digit())
        .unwrap_or(token);

    digits
        .parse::<i64>()
        .ok()
        .and_then(|secs| Local.timestamp_opt(secs, 0).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| token.to_string())
}

/// Prefix cut to at most `max` characters (Unicode scalars, not bytes).
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw_hit(abstract_text: Option<&str>) -> RawDocHit {
        RawDocHit {
            filename: "notes.md".to_string(),
            url: "file:///home/user/notes.md".to_string(),
            mimetype: "text/markdown".to_string(),
            fbytes: 2048,
            mtime: "D1700000000".to_string(),
            abstract_text: abstract_text.map(str::to_string),
        }
    }

    #[test]
    fn preview_respects_request_flag_and_presence() {
        let with = normalize_hit(&raw_hit(Some("snippet")), true);
        assert_eq!(with.preview.as_deref(), Some("snippet"));

        let suppressed = normalize_hit(&raw_hit(Some("snippet")), false);
        assert_eq!(suppressed.preview, None);

        let missing = normalize_hit(&raw_hit(None), true);
        assert_eq!(missing.preview, None);
    }

    #[test]
    fn preview_is_prefix_cut_to_300_chars() {
        let long = "x".repeat(1000);
        let hit = normalize_hit(&raw_hit(Some(&long)), true);
        let preview = hit.preview.unwrap();
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
        assert!(long.starts_with(&preview));
    }

    #[test]
    fn short_preview_passes_through_whole() {
        let hit = normalize_hit(&raw_hit(Some("short")), true);
        assert_eq!(hit.preview.as_deref(), Some("short"));
    }

    #[test]
    fn truncation_is_idempotent() {
        let long = "abc".repeat(200);
        let once = truncate_chars(&long, PREVIEW_MAX_CHARS);
        let twice = truncate_chars(once, PREVIEW_MAX_CHARS);
        assert_eq!(once, twice);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let text = "é".repeat(10);
        assert_eq!(truncate_chars(&text, 4).chars().count(), 4);
    }

    #[test]
    fn mtime_decode_is_deterministic() {
        let first = normalize_hit(&raw_hit(None), false);
        let second = normalize_hit(&raw_hit(None), false);
        assert_eq!(first, second);
        // Decodable token: the readable form is a formatted date, not the token.
        assert_ne!(first.mtime_readable, first.mtime);
        assert_eq!(first.mtime_readable.len(), "2023-11-14 00:00:00".len());
    }

    #[test]
    fn undecodable_mtime_falls_back_to_raw_token() {
        let mut raw = raw_hit(None);
        raw.mtime = "not-a-timestamp".to_string();
        let hit = normalize_hit(&raw, false);
        assert_eq!(hit.mtime_readable, "not-a-timestamp");
    }

    #[test]
    fn bare_epoch_token_decodes_without_marker() {
        let mut raw = raw_hit(None);
        raw.mtime = "1700000000".to_string();
        let hit = normalize_hit(&raw, false);
        assert_ne!(hit.mtime_readable, hit.mtime);
    }

    #[test]
    fn preview_omitted_from_json_when_absent() {
        let hit = normalize_hit(&raw_hit(None), true);
        let json = serde_json::to_value(&hit).unwrap();
        assert!(json.get("preview").is_none());
        assert_eq!(json["size"], 2048);
        assert_eq!(json["mtime"], "D1700000000");
    }
}
