//! JSONL review files.
//!
//! One review record per line. Blank lines are ignored; malformed lines are
//! reported with their line number and skipped so one bad row never hides
//! the rest of the file.

use super::MemorySource;
use crate::model::{ParseError, ReviewRecord, SourceError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Parse JSONL from `reader`, returning good records and per-line errors.
///
/// # Errors
///
/// Returns `SourceError::Io` if reading fails partway.
pub fn parse_jsonl(
    reader: impl BufRead,
) -> Result<(Vec<ReviewRecord>, Vec<ParseError>), SourceError> {
    let mut records = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ReviewRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => errors.push(ParseError::InvalidJson {
                line: index + 1,
                message: e.to_string(),
            }),
        }
    }

    Ok((records, errors))
}

/// Load a JSONL review file into a [`MemorySource`].
///
/// # Errors
///
/// Returns `SourceError::FileNotFound` if the file does not exist.
/// Returns `SourceError::Io` for other I/O errors.
pub fn load_jsonl(path: impl AsRef<Path>) -> Result<MemorySource, SourceError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SourceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let reader = BufReader::new(File::open(path)?);
    let (records, errors) = parse_jsonl(reader)?;

    for error in &errors {
        warn!(path = %path.display(), %error, "Skipping malformed review");
    }
    info!(
        path = %path.display(),
        records = records.len(),
        skipped = errors.len(),
        "Loaded review file"
    );

    Ok(MemorySource::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const GOOD: &str =
        r#"{"id":"r1","wallet_address":"0xabc","created_at":"2025-01-01T00:00:00Z"}"#;

    #[test]
    fn malformed_lines_are_skipped_with_line_numbers() {
        let input = format!("{GOOD}\nnot json\n\n{{\"id\":\"\"}}\n");

        let (records, errors) = parse_jsonl(input.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ParseError::InvalidJson { line: 2, .. }));
        assert!(matches!(errors[1], ParseError::InvalidJson { line: 4, .. }));
    }

    #[test]
    fn load_jsonl_builds_memory_source() {
        let path = std::env::temp_dir().join("reviewfeed_load_jsonl.jsonl");
        fs::write(&path, format!("{GOOD}\n{{broken\n")).unwrap();

        let source = load_jsonl(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(source.len(), 1);
    }

    #[test]
    fn load_jsonl_reports_missing_file() {
        let missing = std::env::temp_dir().join("reviewfeed_missing_98765.jsonl");
        assert!(matches!(
            load_jsonl(&missing),
            Err(SourceError::FileNotFound { .. })
        ));
    }
}
