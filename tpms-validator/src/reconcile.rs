//! Record reconciliation
//!
//! Turns a stream of parsed lines from one source into per-model groups of
//! unique records ready for validation:
//!
//! 1. Lines that failed to parse become failures (source + line number).
//! 2. Records are grouped by discriminator, groups sorted by name.
//! 3. Excluded, non-TPMS and unregistered groups are skipped as a whole.
//! 4. Surviving groups are deduplicated, keeping the first occurrence:
//!    captures by `(model, id)`, reference records by their content minus
//!    the capture time.

use crate::config::ValidatorConfig;
use crate::formats::ParsedLine;
use crate::outcome::ValidationOutcome;
use crate::protocols::Protocol;
use crate::types::{DecodedRecord, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Where a batch of records came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Records captured by our own decoder
    Capture,
    /// Output of the external reference decoder
    Reference,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Capture => write!(f, "capture"),
            SourceKind::Reference => write!(f, "reference"),
        }
    }
}

/// Unique records of one registered model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGroup {
    /// Discriminator shared by every record
    pub model: String,
    /// Registry entry the model dispatches to
    pub protocol: Protocol,
    /// Records seen before deduplication
    pub total: usize,
    /// Unique records in input order
    pub records: Vec<DecodedRecord>,
}

/// Output of reconciling one source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciled {
    /// Groups to validate
    pub groups: Vec<ModelGroup>,
    /// Parse failures and group skips, in the order they arose
    pub outcomes: Vec<ValidationOutcome>,
}

/// Groups and deduplicates records of one source
pub struct Reconciler<'a> {
    config: &'a ValidatorConfig,
}

impl<'a> Reconciler<'a> {
    pub fn new(config: &'a ValidatorConfig) -> Self {
        Self { config }
    }

    /// Reconcile a stream of parsed lines
    pub fn reconcile<I>(&self, kind: SourceKind, lines: I) -> Reconciled
    where
        I: IntoIterator<Item = Result<ParsedLine>>,
    {
        let mut reconciled = Reconciled::default();
        let mut by_model: BTreeMap<String, Vec<DecodedRecord>> = BTreeMap::new();

        for item in lines {
            match item {
                Ok(parsed) => {
                    by_model
                        .entry(parsed.record.model().to_string())
                        .or_default()
                        .push(parsed.record);
                }
                Err(e) => reconciled.outcomes.push(ValidationOutcome::fail(e.to_string())),
            }
        }

        for (model, records) in by_model {
            let total = records.len();

            if self.config.is_excluded(&model) {
                log::info!("[{}] skipping {} records (not a supported protocol)", model, total);
                reconciled.outcomes.push(ValidationOutcome::skip(format!(
                    "{}: skipped {} records (not a supported protocol)",
                    model, total
                )));
                continue;
            }

            if self.config.require_tpms_type && !records[0].is_tpms() {
                let kind_tag = records[0].kind.as_deref().unwrap_or("");
                log::info!("[{}] skipping {} records (type={}, not TPMS)", model, total, kind_tag);
                reconciled.outcomes.push(ValidationOutcome::skip(format!(
                    "{}: skipped {} records (type={}, not TPMS)",
                    model, total, kind_tag
                )));
                continue;
            }

            let Some(protocol) = Protocol::from_model(&model) else {
                log::info!("[{}] skipping {} records (no validation rule)", model, total);
                reconciled.outcomes.push(ValidationOutcome::skip(format!(
                    "{}: skipped {} records (no validation rule)",
                    model, total
                )));
                continue;
            };

            let unique = dedup(kind, records);
            log::info!("[{}] {} unique records (from {} total)", model, unique.len(), total);

            reconciled.groups.push(ModelGroup {
                model,
                protocol,
                total,
                records: unique,
            });
        }

        reconciled
    }
}

/// Keep the first record per identity, preserving input order
pub fn dedup(kind: SourceKind, records: Vec<DecodedRecord>) -> Vec<DecodedRecord> {
    match kind {
        SourceKind::Capture => {
            let mut seen = HashSet::new();
            records
                .into_iter()
                .filter(|r| seen.insert(r.identity()))
                .collect()
        }
        SourceKind::Reference => {
            let mut seen = HashSet::new();
            records
                .into_iter()
                .filter(|r| seen.insert(r.signature()))
                .collect()
        }
    }
}
