//! Run configuration built from command-line arguments

use crate::Args;
use anyhow::{bail, Result};
use serde::Serialize;
use std::path::Path;
use tpms_validator::{Source, ValidatorConfig};

/// Capture files looked up under the root when no source is given
pub const DEFAULT_CAPTURES: [&str; 2] = ["tpms_realworld.jsonl", "tpms_sample.jsonl"];

/// Reference-decoder tree looked up under the root when no source is given
pub const DEFAULT_REFERENCE_TREE: &str = "tests/rtl_433/tests";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// Everything one run needs
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub validator: ValidatorConfig,
    pub sources: Vec<Source>,
    pub output: OutputFormat,
}

impl RunConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut validator = ValidatorConfig::new().with_self_test(!args.no_self_test);

        if let Some(tolerance) = args.tolerance {
            if !tolerance.is_finite() || tolerance < 0.0 {
                bail!("tolerance must be a non-negative number, got {}", tolerance);
            }
            validator = validator.with_tolerance(tolerance);
        }
        for model in &args.exclude_model {
            validator = validator.exclude_model(model.clone());
        }

        let mut sources: Vec<Source> = args.capture.iter().map(Source::capture).collect();
        sources.extend(args.reference.iter().map(Source::reference));
        if sources.is_empty() {
            sources = default_sources(&args.root);
            log::debug!("No sources given, using defaults under {:?}", args.root);
        }

        Ok(Self {
            validator,
            sources,
            output: if args.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        })
    }
}

/// Conventional capture files and reference tree under `root`
pub fn default_sources(root: &Path) -> Vec<Source> {
    let mut sources: Vec<Source> = DEFAULT_CAPTURES
        .iter()
        .map(|name| Source::capture(root.join(name)))
        .collect();
    sources.push(Source::reference(root.join(DEFAULT_REFERENCE_TREE)));
    sources
}
