//! TPMS Decoder Validation Library
//!
//! A stateless library for checking decoded tire-pressure sensor records
//! against the conversion formulas each protocol documents.
//!
//! # Architecture
//!
//! This library is intentionally focused on validation:
//! - Parses JSON-lines record sources (user captures, reference-decoder trees)
//! - Groups records by protocol and removes duplicates
//! - Round-trips every physical reading through the protocol's raw formula
//! - Aggregates pass/fail/skip outcomes into a mergeable `Tally`
//!
//! The library does NOT:
//! - Decode radio signals or raw payloads
//! - Parse command-line arguments
//! - Print reports or pick an exit status
//!
//! All of that lives in the application layer (tpms-validator-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use tpms_validator::{Source, Validator, ValidatorConfig};
//!
//! let config = ValidatorConfig::new()
//!     .with_tolerance(0.01)
//!     .exclude_model("Interlogix-Security");
//! let validator = Validator::with_config(config);
//!
//! let mut tally = validator.self_test();
//! tally.merge(validator.validate_source(&Source::capture("tpms_sample.jsonl")));
//! tally.merge(validator.validate_source(&Source::reference("tests/rtl_433/tests")));
//!
//! for failure in tally.failures() {
//!     eprintln!("FAIL: {}", failure);
//! }
//! println!("{} passed, {} failed", tally.passed(), tally.failed());
//! ```

// Public modules
pub mod checksum;
pub mod config;
pub mod differential;
pub mod formats;
pub mod outcome;
pub mod protocols;
pub mod reconcile;
pub mod selftest;
pub mod tally;
pub mod types;
pub mod validator;

// Re-export main types for convenience
pub use checksum::{crc16, crc8, sum_checksum, xor_checksum, ChecksumDescriptor, ChecksumKind};
pub use config::ValidatorConfig;
pub use differential::DifferentialValidator;
pub use outcome::{ValidationOutcome, Verdict};
pub use protocols::{ConversionFormula, Protocol, ProtocolSpec};
pub use reconcile::{Reconciler, SourceKind};
pub use tally::Tally;
pub use types::{DecodedRecord, RecordId, Result, ValidatorError};
pub use validator::{Source, Validator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
