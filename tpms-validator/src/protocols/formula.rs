//! Linear raw-to-physical conversion formulas
//!
//! Every TPMS protocol maps an integer raw code extracted from the payload to a
//! physical reading with `physical = raw * scale + offset`. Validating a decoded
//! record runs the formula backwards: recover the nearest integer raw code,
//! re-apply the forward formula and compare against the recorded reading.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Default equality tolerance for round-trip comparison, in physical units
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Physical quantity reported by a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantity {
    Pressure,
    Temperature,
}

impl Quantity {
    /// Units a record may carry this quantity in
    pub fn units(&self) -> &'static [Unit] {
        match self {
            Quantity::Pressure => &[Unit::Kilopascal, Unit::Psi],
            Quantity::Temperature => &[Unit::Celsius, Unit::Fahrenheit],
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Pressure => write!(f, "pressure"),
            Quantity::Temperature => write!(f, "temperature"),
        }
    }
}

/// Engineering unit of a physical reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Kilopascal,
    Psi,
    Celsius,
    Fahrenheit,
}

impl Unit {
    /// The quantity this unit measures
    pub fn quantity(&self) -> Quantity {
        match self {
            Unit::Kilopascal | Unit::Psi => Quantity::Pressure,
            Unit::Celsius | Unit::Fahrenheit => Quantity::Temperature,
        }
    }

    /// Name of the record field carrying a reading in this unit
    pub fn field_name(&self) -> &'static str {
        match self {
            Unit::Kilopascal => "pressure_kPa",
            Unit::Psi => "pressure_PSI",
            Unit::Celsius => "temperature_C",
            Unit::Fahrenheit => "temperature_F",
        }
    }

    /// Short unit symbol used in messages
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Kilopascal => "kPa",
            Unit::Psi => "PSI",
            Unit::Celsius => "C",
            Unit::Fahrenheit => "F",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A linear conversion `physical = raw * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionFormula {
    /// Unit of the physical side
    pub unit: Unit,
    /// Multiplier applied to the raw code
    pub scale: f64,
    /// Constant added after scaling
    pub offset: f64,
    /// Width of the raw field in bits
    pub raw_bits: u8,
}

impl ConversionFormula {
    /// Create a formula over an unsigned raw field of `raw_bits` bits
    pub const fn new(unit: Unit, scale: f64, offset: f64, raw_bits: u8) -> Self {
        Self {
            unit,
            scale,
            offset,
            raw_bits,
        }
    }

    /// Raw code to physical value
    pub fn forward(&self, raw: i64) -> f64 {
        raw as f64 * self.scale + self.offset
    }

    /// Physical value to the nearest integer raw code
    pub fn inverse(&self, physical: f64) -> i64 {
        ((physical - self.offset) / self.scale).round() as i64
    }

    /// Raw codes the payload field can hold
    pub fn raw_range(&self) -> RangeInclusive<i64> {
        0..=((1i64 << self.raw_bits) - 1)
    }

    /// Invert `physical`, re-apply the formula and compare within `tolerance`
    pub fn round_trip(&self, physical: f64, tolerance: f64) -> RoundTrip {
        let raw = self.inverse(physical);
        let recomputed = self.forward(raw);
        RoundTrip {
            physical,
            raw,
            recomputed,
            deviation: (recomputed - physical).abs(),
            in_range: self.raw_range().contains(&raw),
            tolerance,
        }
    }
}

impl fmt::Display for ConversionFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = raw * {}", self.unit, self.scale)?;
        if self.offset < 0.0 {
            write!(f, " - {}", -self.offset)
        } else if self.offset > 0.0 {
            write!(f, " + {}", self.offset)
        } else {
            Ok(())
        }
    }
}

/// Result of running a recorded reading through inverse then forward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundTrip {
    /// Reading as recorded
    pub physical: f64,
    /// Recovered raw code
    pub raw: i64,
    /// Forward formula applied to `raw`
    pub recomputed: f64,
    /// Absolute difference between `recomputed` and `physical`
    pub deviation: f64,
    /// Whether `raw` fits the payload field
    pub in_range: bool,
    /// Tolerance the comparison used
    pub tolerance: f64,
}

impl RoundTrip {
    /// True when the reading maps to a representable raw code within tolerance
    pub fn matches(&self) -> bool {
        self.in_range && self.deviation <= self.tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PSI_TENTHS: ConversionFormula = ConversionFormula::new(Unit::Psi, 0.2, 0.0, 10);

    #[test]
    fn test_forward_and_inverse() {
        let f = ConversionFormula::new(Unit::Kilopascal, 1.0, 60.0, 8);
        assert_eq!(f.forward(2), 62.0);
        assert_eq!(f.inverse(62.0), 2);
        assert_eq!(f.inverse(62.4), 2);
        assert_eq!(f.inverse(62.6), 3);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let rt = PSI_TENTHS.round_trip(32.8, DEFAULT_TOLERANCE);
        assert_eq!(rt.raw, 164);
        assert!(rt.matches());
    }

    #[test]
    fn test_round_trip_off_grid_value_fails() {
        let rt = PSI_TENTHS.round_trip(32.85, DEFAULT_TOLERANCE);
        assert!(rt.in_range);
        assert!(!rt.matches());
        assert!((rt.deviation - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_round_trip_out_of_range_fails() {
        // 1023 is the largest 10-bit code
        assert!(PSI_TENTHS.round_trip(204.6, DEFAULT_TOLERANCE).matches());
        let rt = PSI_TENTHS.round_trip(204.8, DEFAULT_TOLERANCE);
        assert_eq!(rt.raw, 1024);
        assert!(!rt.in_range);
        assert!(!rt.matches());
    }

    #[test]
    fn test_raw_range() {
        assert_eq!(PSI_TENTHS.raw_range(), 0..=1023);
        let byte = ConversionFormula::new(Unit::Celsius, 1.0, -40.0, 8);
        assert_eq!(byte.raw_range(), 0..=255);
    }

    #[test]
    fn test_unit_metadata() {
        assert_eq!(Unit::Kilopascal.field_name(), "pressure_kPa");
        assert_eq!(Unit::Fahrenheit.quantity(), Quantity::Temperature);
        assert_eq!(Quantity::Pressure.units(), &[Unit::Kilopascal, Unit::Psi]);
    }

    #[test]
    fn test_formula_display() {
        let f = ConversionFormula::new(Unit::Celsius, 1.0, -50.0, 8);
        assert_eq!(f.to_string(), "C = raw * 1 - 50");
        assert_eq!(PSI_TENTHS.to_string(), "PSI = raw * 0.2");
    }
}
