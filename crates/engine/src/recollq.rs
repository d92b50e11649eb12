//! `recollq`-backed engine implementation.
//!
//! Each [`IndexQuery::execute`] runs one `recollq` process with `-F`, which
//! prints a header echoing the parsed query and the total result count,
//! followed by one line per hit with the requested fields base64 encoded.
//! The parsed hits are buffered and drained by `fetch_next`, so the cursor
//! contract holds even though the subprocess delivers everything up front.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{EngineError, Result};
use crate::{IndexEngine, IndexQuery, RawDocHit};

const RECOLLQ_BIN: &str = "recollq";

/// Field order requested with `-F`; must match the positional parse below.
const FIELD_SPEC: &str = "filename url mimetype fbytes mtime abstract";

/// Connected handle to a Recoll index, keyed by its configuration directory.
pub struct RecollDb {
    confdir: PathBuf,
}

impl RecollDb {
    /// Verify the configuration directory and the `recollq` executable.
    ///
    /// This is the single connect attempt of the process; callers degrade to
    /// an unavailable state on failure rather than retrying.
    pub fn connect(confdir: &Path) -> Result<Self> {
        if !confdir.is_dir() {
            return Err(EngineError::Connect(format!(
                "index configuration directory not found: {}",
                confdir.display()
            )));
        }

        // recollq with no arguments exits with a usage message; all we need
        // here is proof that the binary can be spawned at all.
        Command::new(RECOLLQ_BIN)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|err| {
                EngineError::Connect(format!("cannot run {RECOLLQ_BIN}: {err}"))
            })?;

        Ok(Self {
            confdir: confdir.to_path_buf(),
        })
    }
}

impl IndexEngine for RecollDb {
    fn query(&self) -> Result<Box<dyn IndexQuery>> {
        Ok(Box::new(RecollQuery {
            confdir: self.confdir.clone(),
            hits: VecDeque::new(),
        }))
    }
}

struct RecollQuery {
    confdir: PathBuf,
    hits: VecDeque<RawDocHit>,
}

impl IndexQuery for RecollQuery {
    fn execute(&mut self, expression: &str) -> Result<usize> {
        let output = Command::new(RECOLLQ_BIN)
            .arg("-c")
            .arg(&self.confdir)
            .arg("-F")
            .arg(FIELD_SPEC)
            .arg(expression)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Execute(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut total = None;
        self.hits.clear();

        for line in stdout.lines() {
            match total {
                // Header lines: the query echo, then "<n> results ...".
                None => total = parse_result_count(line),
                Some(_) => match parse_hit_line(line) {
                    Ok(Some(hit)) => self.hits.push_back(hit),
                    Ok(None) => {}
                    Err(err) => log::warn!("skipping unreadable recollq line: {err}"),
                },
            }
        }

        total.ok_or_else(|| {
            EngineError::Execute("recollq output carried no result count".to_string())
        })
    }

    fn fetch_next(&mut self) -> Result<Option<RawDocHit>> {
        Ok(self.hits.pop_front())
    }
}

fn parse_result_count(line: &str) -> Option<usize> {
    let mut words = line.split_whitespace();
    let count = words.next()?.parse().ok()?;
    words.next()?.starts_with("result").then_some(count)
}

fn parse_hit_line(line: &str) -> Result<Option<RawDocHit>> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut fields = Vec::new();
    for token in line.split_whitespace() {
        let bytes = STANDARD
            .decode(token)
            .map_err(|err| EngineError::Parse(format!("bad base64 field: {err}")))?;
        fields.push(String::from_utf8_lossy(&bytes).into_owned());
    }
    if fields.len() < 5 {
        return Err(EngineError::Parse(format!(
            "expected at least 5 fields, got {}",
            fields.len()
        )));
    }

    let mut fields = fields.into_iter();
    let filename = fields.next().unwrap_or_default();
    let url = fields.next().unwrap_or_default();
    let mimetype = fields.next().unwrap_or_default();
    let fbytes = fields.next().unwrap_or_default().trim().parse().unwrap_or(0);
    let mtime = fields.next().unwrap_or_default();
    let abstract_text = fields.next().filter(|text| !text.is_empty());

    Ok(Some(RawDocHit {
        filename,
        url,
        mimetype,
        fbytes,
        mtime,
        abstract_text,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encode(field: &str) -> String {
        STANDARD.encode(field)
    }

    #[test]
    fn result_count_parses_recollq_header() {
        assert_eq!(parse_result_count("4 results"), Some(4));
        assert_eq!(parse_result_count("0 results (printing max 2000)"), Some(0));
        assert_eq!(parse_result_count("Recoll query: (todo)"), None);
        assert_eq!(parse_result_count(""), None);
    }

    #[test]
    fn hit_line_decodes_all_fields() {
        let line = [
            encode("notes.md"),
            encode("file:///home/user/notes.md"),
            encode("text/markdown"),
            encode("1234"),
            encode("D1700000000"),
            encode("weekly todo list"),
        ]
        .join(" ");

        let hit = parse_hit_line(&line).unwrap().unwrap();
        assert_eq!(hit.filename, "notes.md");
        assert_eq!(hit.url, "file:///home/user/notes.md");
        assert_eq!(hit.mimetype, "text/markdown");
        assert_eq!(hit.fbytes, 1234);
        assert_eq!(hit.mtime, "D1700000000");
        assert_eq!(hit.abstract_text.as_deref(), Some("weekly todo list"));
    }

    #[test]
    fn hit_line_without_abstract_yields_none() {
        let line = [
            encode("a.pdf"),
            encode("file:///tmp/a.pdf"),
            encode("application/pdf"),
            encode("10"),
            encode("D1700000000"),
        ]
        .join(" ");

        let hit = parse_hit_line(&line).unwrap().unwrap();
        assert_eq!(hit.abstract_text, None);
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_hit_line("   ").unwrap(), None);
    }

    #[test]
    fn short_lines_are_rejected() {
        let line = [encode("a"), encode("b")].join(" ");
        assert!(matches!(
            parse_hit_line(&line),
            Err(EngineError::Parse(_))
        ));
    }

    #[test]
    fn connect_rejects_missing_confdir() {
        let err = RecollDb::connect(Path::new("/nonexistent/recoll-confdir"))
            .err()
            .expect("connect must fail");
        assert!(matches!(err, EngineError::Connect(_)));
    }
}
