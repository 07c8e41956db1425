//! Validator configuration types
//!
//! The validator has no configuration file: its rules live in the fixed
//! protocol registry. This struct only carries the few knobs callers may
//! adjust (comparison tolerance, exclusion set, discovery filter).

use crate::protocols::DEFAULT_TOLERANCE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Models known not to be TPMS sensors or not handled by our decoders
pub const DEFAULT_EXCLUDED_MODELS: [&str; 3] = ["Steelmate", "Truck", "Acurite-5n1"];

/// Configuration for the validator library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Round-trip equality tolerance in physical units
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Discriminators whose groups are skipped wholesale
    #[serde(default = "default_excluded_models")]
    pub excluded_models: BTreeSet<String>,

    /// Skip groups whose first record is not tagged "TPMS"
    #[serde(default = "default_true")]
    pub require_tpms_type: bool,

    /// File extensions picked up when walking a reference directory
    #[serde(default = "default_reference_extensions")]
    pub reference_extensions: Vec<String>,

    /// Run the fixed checksum and formula vectors before any source
    #[serde(default = "default_true")]
    pub run_self_test: bool,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_excluded_models() -> BTreeSet<String> {
    DEFAULT_EXCLUDED_MODELS.iter().map(|m| m.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_reference_extensions() -> Vec<String> {
    vec!["json".to_string()]
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            excluded_models: default_excluded_models(),
            require_tpms_type: true,
            reference_extensions: default_reference_extensions(),
            run_self_test: true,
        }
    }
}

impl ValidatorConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the comparison tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder method: add a discriminator to the exclusion set
    pub fn exclude_model(mut self, model: impl Into<String>) -> Self {
        self.excluded_models.insert(model.into());
        self
    }

    /// Builder method: require or ignore the "TPMS" type tag
    pub fn with_tpms_type_check(mut self, enabled: bool) -> Self {
        self.require_tpms_type = enabled;
        self
    }

    /// Builder method: replace the reference file extensions
    pub fn with_reference_extensions(mut self, extensions: Vec<String>) -> Self {
        self.reference_extensions = extensions;
        self
    }

    /// Builder method: enable or disable the self-test
    pub fn with_self_test(mut self, enabled: bool) -> Self {
        self.run_self_test = enabled;
        self
    }

    /// Check if a discriminator is excluded
    pub fn is_excluded(&self, model: &str) -> bool {
        self.excluded_models.contains(model)
    }
}
