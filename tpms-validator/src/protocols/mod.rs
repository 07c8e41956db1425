//! Protocol registry and conversion formulas
//!
//! This module contains the linear raw/physical conversion formulas and the
//! closed table of supported TPMS protocols.

pub mod formula;
pub mod registry;

// Re-export key types for convenience
pub use formula::{ConversionFormula, Quantity, RoundTrip, Unit, DEFAULT_TOLERANCE};
pub use registry::{all_specs, FieldRule, Missing, Protocol, ProtocolSpec};
