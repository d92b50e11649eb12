//! Recoll query expression construction.
//!
//! These functions translate structured tool arguments into a single Recoll
//! query string. The user query passes through verbatim (implicit AND, `OR`,
//! `NOT`, quoted phrases, wildcards); filter clauses are appended in a fixed
//! form so output is deterministic. Nothing here validates engine syntax;
//! a bad expression surfaces as an execute error, not a builder error.

/// Append a `date:` clause constraining modification time.
///
/// Dates are `YYYY-MM-DD`. Either bound may be absent; with neither bound
/// the query is returned untouched.
pub fn with_date_range(query: &str, start: Option<&str>, end: Option<&str>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => format!("{query} date:{start}/{end}"),
        (Some(start), None) => format!("{query} date:{start}/"),
        (None, Some(end)) => format!("{query} date:/{end}"),
        (None, None) => query.to_string(),
    }
}

/// Append a `mime:` clause. `filetype` is taken verbatim and may be a bare
/// keyword (`pdf`) or a full MIME pattern (`image/*`).
pub fn with_filetype(query: &str, filetype: &str) -> String {
    format!("{query} mime:{filetype}")
}

/// Expression matching files modified within the last `days` days. This is
/// the whole expression; the recent-files operation has no free-text term.
pub fn recent(days: u32) -> String {
    format!("date:{days}d/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn date_clause_with_both_bounds() {
        assert_eq!(
            with_date_range("notes", Some("2025-01-01"), Some("2025-06-30")),
            "notes date:2025-01-01/2025-06-30"
        );
    }

    #[test]
    fn date_clause_with_start_only() {
        assert_eq!(
            with_date_range("todo", Some("2025-01-01"), None),
            "todo date:2025-01-01/"
        );
    }

    #[test]
    fn date_clause_with_end_only() {
        assert_eq!(
            with_date_range("todo", None, Some("2025-01-01")),
            "todo date:/2025-01-01"
        );
    }

    #[test]
    fn no_bounds_leaves_query_untouched() {
        assert_eq!(with_date_range("todo", None, None), "todo");
    }

    #[test]
    fn filetype_clause_is_verbatim() {
        assert_eq!(with_filetype("yubikey", "pdf"), "yubikey mime:pdf");
        assert_eq!(with_filetype("holiday", "image/*"), "holiday mime:image/*");
    }

    #[test]
    fn recent_expression_has_no_free_text() {
        assert_eq!(recent(7), "date:7d/");
        assert_eq!(recent(30), "date:30d/");
    }

    #[test]
    fn engine_syntax_passes_through_unmodified() {
        assert_eq!(
            with_date_range("\"exact phrase\" OR draft*", Some("2025-01-01"), None),
            "\"exact phrase\" OR draft* date:2025-01-01/"
        );
    }
}
