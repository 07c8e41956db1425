//! JSON-lines record parser
//!
//! One JSON object per line, UTF-8. Blank lines are skipped; every other line
//! yields either a parsed record or a `MalformedLine` error carrying the source
//! name and the 1-based line number, and iteration carries on after errors.

use crate::types::{DecodedRecord, Result, ValidatorError};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// A record together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    /// Source name (usually the file path)
    pub source: String,
    /// 1-based line number
    pub line: usize,
    /// Parsed record
    pub record: DecodedRecord,
}

/// JSON-lines parser
pub struct JsonlParser;

impl JsonlParser {
    /// Open a JSON-lines file and return an iterator over its records
    pub fn parse(path: &Path) -> Result<JsonlRecordIterator<BufReader<File>>> {
        log::debug!("Parsing JSON lines: {:?}", path);

        let file = File::open(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => ValidatorError::SourceNotFound(path.to_path_buf()),
            _ => ValidatorError::Open {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Ok(Self::from_reader(
            BufReader::new(file),
            path.display().to_string(),
        ))
    }

    /// Iterate over records from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R, source: impl Into<String>) -> JsonlRecordIterator<R> {
        JsonlRecordIterator {
            lines: reader.lines(),
            line_no: 0,
            source: source.into(),
            exhausted: false,
        }
    }
}

/// Iterator over parsed records of one JSON-lines source
pub struct JsonlRecordIterator<R> {
    lines: Lines<R>,
    line_no: usize,
    source: String,
    exhausted: bool,
}

impl<R: BufRead> Iterator for JsonlRecordIterator<R> {
    type Item = Result<ParsedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.exhausted {
                return None;
            }
            let line = self.lines.next()?;
            self.line_no += 1;

            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    // invalid UTF-8 costs one line; any other read error ends the source
                    if e.kind() != std::io::ErrorKind::InvalidData {
                        self.exhausted = true;
                    }
                    return Some(Err(ValidatorError::MalformedLine {
                        source_name: self.source.clone(),
                        line: self.line_no,
                        message: e.to_string(),
                    }));
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            return Some(match DecodedRecord::from_json(trimmed) {
                Ok(record) => Ok(ParsedLine {
                    source: self.source.clone(),
                    line: self.line_no,
                    record,
                }),
                Err(e) => Err(ValidatorError::MalformedLine {
                    source_name: self.source.clone(),
                    line: self.line_no,
                    message: e.to_string(),
                }),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_blank_lines_skipped_and_numbered() {
        let input = "\n{\"model\":\"Ford\"}\n   \n{\"model\":\"Schrader\"}\n";
        let parsed: Vec<_> = JsonlParser::from_reader(Cursor::new(input), "mem")
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].line, 2);
        assert_eq!(parsed[0].record.model(), "Ford");
        assert_eq!(parsed[1].line, 4);
        assert_eq!(parsed[1].source, "mem");
    }

    #[test]
    fn test_malformed_line_does_not_stop_iteration() {
        let input = "{\"model\":\"Ford\"}\nnot json\n{\"model\":\"Toyota\"}";
        let items: Vec<_> = JsonlParser::from_reader(Cursor::new(input), "capture.jsonl").collect();

        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        match &items[1] {
            Err(ValidatorError::MalformedLine {
                source_name, line, ..
            }) => {
                assert_eq!(source_name, "capture.jsonl");
                assert_eq!(*line, 2);
            }
            other => panic!("expected malformed line, got {:?}", other),
        }
        assert_eq!(items[2].as_ref().unwrap().record.model(), "Toyota");
    }

    #[test]
    fn test_invalid_utf8_line_costs_one_line() {
        let mut input = b"{\"model\":\"Ford\"}\n".to_vec();
        input.extend_from_slice(&[0xFF, 0xFE, 0x7B, b'\n']);
        input.extend_from_slice(b"{\"model\":\"Toyota\"}\n");

        let items: Vec<_> = JsonlParser::from_reader(Cursor::new(input), "capture.jsonl").collect();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().record.model(), "Ford");
        match &items[1] {
            Err(ValidatorError::MalformedLine { line, message, .. }) => {
                assert_eq!(*line, 2);
                assert!(message.contains("UTF-8"), "{}", message);
            }
            other => panic!("expected malformed line, got {:?}", other),
        }
        let toyota = items[2].as_ref().unwrap();
        assert_eq!(toyota.line, 3);
        assert_eq!(toyota.record.model(), "Toyota");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_names_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.jsonl");
        std::fs::write(&path, "{}\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();

        // privileged users can open it anyway
        if File::open(&path).is_ok() {
            return;
        }

        match JsonlParser::parse(&path) {
            Err(err @ ValidatorError::Open { .. }) => {
                assert!(err.to_string().contains("locked.jsonl"), "{}", err);
            }
            Err(other) => panic!("expected open error, got {:?}", other),
            Ok(_) => panic!("expected open error"),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = JsonlParser::parse(Path::new("/nonexistent/tpms_sample.jsonl"));
        assert!(matches!(result, Err(ValidatorError::SourceNotFound(_))));
    }
}
