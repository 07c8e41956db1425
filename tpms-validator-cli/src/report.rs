//! Report generation
//!
//! Renders the merged tally either as a plain-text report or as a single
//! JSON summary object.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::io::{self, Write};
use tpms_validator::{Source, Tally};

const RULE: &str = "===============================================";

/// Machine-readable summary of one run
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub generated_at: String,
    pub version: &'static str,
    pub sources: &'a [Source],
    pub success: bool,
    pub total: usize,
    #[serde(flatten)]
    pub tally: &'a Tally,
}

impl<'a> Summary<'a> {
    pub fn new(tally: &'a Tally, sources: &'a [Source], generated: DateTime<Local>) -> Self {
        Self {
            generated_at: generated.to_rfc3339(),
            version: tpms_validator::VERSION,
            sources,
            success: tally.is_success(),
            total: tally.total(),
            tally,
        }
    }
}

/// Write the plain-text report
pub fn write_text<W: Write>(
    out: &mut W,
    tally: &Tally,
    sources: &[Source],
    generated: DateTime<Local>,
) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "  TPMS Decoder Validation Report")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Generated: {}", generated.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out)?;

    writeln!(out, "Sources:")?;
    for source in sources {
        writeln!(out, "  {}", source)?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "Results: {} passed, {} failed, {} skipped ({} checks)",
        tally.passed(),
        tally.failed(),
        tally.skipped(),
        tally.total()
    )?;

    if !tally.failures().is_empty() {
        writeln!(out)?;
        writeln!(out, "Failures:")?;
        for (i, failure) in tally.failures().iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, failure)?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "RESULT: {}",
        if tally.is_success() { "PASS" } else { "FAIL" }
    )?;
    Ok(())
}

/// Write the JSON summary followed by a newline
pub fn write_json<W: Write>(out: &mut W, summary: &Summary<'_>) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, summary)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tpms_validator::ValidationOutcome;

    fn sample_tally() -> Tally {
        vec![
            ValidationOutcome::pass("ok"),
            ValidationOutcome::skip("Steelmate: skipped 2 records (not a supported protocol)"),
            ValidationOutcome::fail("Ford pressure mismatch"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_text_report_lists_failures() {
        let tally = sample_tally();
        let sources = vec![Source::capture("tpms_sample.jsonl")];
        let mut buf = Vec::new();
        write_text(&mut buf, &tally, &sources, Local::now()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("capture tpms_sample.jsonl"));
        assert!(text.contains("Results: 1 passed, 1 failed, 1 skipped (3 checks)"));
        assert!(text.contains("  1. Ford pressure mismatch"));
        assert!(text.trim_end().ends_with("RESULT: FAIL"));
    }

    #[test]
    fn test_text_report_clean_run() {
        let tally: Tally = vec![ValidationOutcome::pass("ok")].into_iter().collect();
        let mut buf = Vec::new();
        write_text(&mut buf, &tally, &[], Local::now()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(!text.contains("Failures:"));
        assert!(text.contains("RESULT: PASS"));
    }

    #[test]
    fn test_json_summary_fields() {
        let tally = sample_tally();
        let sources = vec![Source::reference("tests/rtl_433/tests")];
        let mut buf = Vec::new();
        write_json(&mut buf, &Summary::new(&tally, &sources, Local::now())).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["passed"], 1);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["skipped"], 1);
        assert_eq!(value["total"], 3);
        assert_eq!(value["success"], false);
        assert_eq!(value["failures"][0], "Ford pressure mismatch");
        assert_eq!(value["sources"][0]["kind"], "reference");
    }
}
