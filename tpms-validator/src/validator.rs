//! Main validator API
//!
//! The [`Validator`] ties the pieces together: it loads a source, reconciles
//! its records, runs the differential checks and returns a [`Tally`]. Every
//! error is turned into an outcome; nothing here panics on bad input.

use crate::config::ValidatorConfig;
use crate::differential::DifferentialValidator;
use crate::formats::{discover_json_files, JsonlParser, ParsedLine};
use crate::outcome::ValidationOutcome;
use crate::reconcile::{Reconciler, SourceKind};
use crate::selftest;
use crate::tally::Tally;
use crate::types::{DecodedRecord, Result, ValidatorError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A record source: one JSON-lines file or a directory of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub kind: SourceKind,
    pub path: PathBuf,
}

impl Source {
    pub fn capture(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::Capture,
            path: path.into(),
        }
    }

    pub fn reference(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::Reference,
            path: path.into(),
        }
    }

    /// Files making up this source
    ///
    /// A directory is walked for files with one of `extensions`; a plain file
    /// is taken as-is whatever its extension.
    pub fn files(&self, extensions: &[String]) -> Result<Vec<PathBuf>> {
        if self.path.is_dir() {
            discover_json_files(&self.path, extensions)
        } else if self.path.exists() {
            Ok(vec![self.path.clone()])
        } else {
            Err(ValidatorError::SourceNotFound(self.path.clone()))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.path.display())
    }
}

/// Entry point for all validation operations
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    /// Create a validator with the default configuration
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Run the built-in checksum and formula vectors
    pub fn self_test(&self) -> Tally {
        log::info!("Running self-test vectors");
        selftest::run_all(self.config.tolerance).into_iter().collect()
    }

    /// Check one record against its protocol, without grouping or dedup
    pub fn validate_record(&self, record: &DecodedRecord) -> Vec<ValidationOutcome> {
        DifferentialValidator::validate(record, self.config.tolerance)
    }

    /// Reconcile and validate a stream of parsed lines
    ///
    /// Parse failures and group skips are counted first, then every unique
    /// record of each surviving group in model order.
    pub fn validate_lines<I>(&self, kind: SourceKind, lines: I) -> Tally
    where
        I: IntoIterator<Item = Result<ParsedLine>>,
    {
        let reconciled = Reconciler::new(&self.config).reconcile(kind, lines);

        let mut tally = Tally::new();
        tally.extend(reconciled.outcomes);

        for group in reconciled.groups {
            log::debug!(
                "Validating {} {} record(s) against {}",
                group.records.len(),
                group.model,
                group.protocol
            );
            for record in &group.records {
                tally.extend(self.validate_record(record));
            }
        }

        tally
    }

    /// Load, reconcile and validate one source
    ///
    /// A missing source is one skip. Files of a directory source are pooled
    /// before grouping, so deduplication spans files.
    pub fn validate_source(&self, source: &Source) -> Tally {
        log::info!("Validating {}", source);

        let files = match source.files(&self.config.reference_extensions) {
            Ok(files) => files,
            Err(ValidatorError::SourceNotFound(path)) => {
                log::warn!("Source not found: {:?}", path);
                return std::iter::once(ValidationOutcome::skip(format!(
                    "{} source not found: {}",
                    source.kind,
                    path.display()
                )))
                .collect();
            }
            Err(e) => return std::iter::once(ValidationOutcome::fail(e.to_string())).collect(),
        };

        log::debug!("{} file(s) in {}", files.len(), source);
        self.validate_lines(source.kind, pooled_lines(&files))
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lines of every file in order; a file that cannot be opened yields one error
fn pooled_lines(files: &[PathBuf]) -> impl Iterator<Item = Result<ParsedLine>> + '_ {
    files.iter().flat_map(|file| open_lines(file))
}

fn open_lines(file: &Path) -> Box<dyn Iterator<Item = Result<ParsedLine>>> {
    match JsonlParser::parse(file) {
        Ok(lines) => Box::new(lines),
        Err(e) => Box::new(std::iter::once(Err(e))),
    }
}
