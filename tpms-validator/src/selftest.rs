//! Built-in self-test
//!
//! Fixed checksum and conversion vectors checked before any source is read.
//! A failing vector means the engine or the registry is broken, not the data.

use crate::checksum::ChecksumDescriptor;
use crate::outcome::ValidationOutcome;
use crate::protocols::registry::{
    EG53MA4_PRESSURE_NATIVE, EG53MA4_PRESSURE_REFERENCE, ELANTRA2012_PRESSURE, FORD_PRESSURE,
    PMV107J_PRESSURE, SCHRADER_PRESSURE, SMD3MA4_PRESSURE,
};
use crate::protocols::{all_specs, ConversionFormula, Unit};

/// Standard check input for checksum catalogues
pub const CHECK_INPUT: &[u8] = b"123456789";

/// Counting bytes 0x01..=0x0A, used where no catalogue vector exists
pub const COUNTING_INPUT: &[u8] = &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A];

/// A named checksum with its expected value over `input`
#[derive(Debug, Clone, Copy)]
pub struct ChecksumVector {
    pub name: &'static str,
    pub checksum: ChecksumDescriptor,
    pub input: &'static [u8],
    pub expected: u16,
}

/// A named formula with a raw code and the physical value it must produce
#[derive(Debug, Clone, Copy)]
pub struct FormulaVector {
    pub name: &'static str,
    pub formula: ConversionFormula,
    pub raw: i64,
    pub expected: f64,
}

// Formulas cross-checked against other decoders that have no registry entry
const BMW_GEN45_PRESSURE: ConversionFormula = ConversionFormula::new(Unit::Kilopascal, 2.45, 0.0, 8);
const BMW_GEN23_PRESSURE: ConversionFormula =
    ConversionFormula::new(Unit::Kilopascal, 2.5, -107.5, 8);
const PORSCHE_PRESSURE: ConversionFormula =
    ConversionFormula::new(Unit::Kilopascal, 2.5, -100.0, 8);
const GM_AFTERMARKET_PRESSURE: ConversionFormula =
    ConversionFormula::new(Unit::Kilopascal, 2.75, 0.0, 8);

pub const CHECKSUM_VECTORS: [ChecksumVector; 7] = [
    ChecksumVector {
        name: "CRC-8 poly=0x07 init=0x00",
        checksum: ChecksumDescriptor::crc8(0x07, 0x00),
        input: CHECK_INPUT,
        expected: 0xF4,
    },
    ChecksumVector {
        name: "CRC-16 poly=0x1021 init=0x0000",
        checksum: ChecksumDescriptor::crc16(0x1021, 0x0000),
        input: CHECK_INPUT,
        expected: 0x31C3,
    },
    ChecksumVector {
        name: "CRC-16 poly=0x1021 init=0xFFFF",
        checksum: ChecksumDescriptor::crc16(0x1021, 0xFFFF),
        input: CHECK_INPUT,
        expected: 0x29B1,
    },
    ChecksumVector {
        name: "SUM-8",
        checksum: ChecksumDescriptor::sum8(9),
        input: CHECK_INPUT,
        expected: 0xDD,
    },
    ChecksumVector {
        name: "XOR-8",
        checksum: ChecksumDescriptor::xor8(9),
        input: CHECK_INPUT,
        expected: 0x31,
    },
    // PMV-107J polynomial
    ChecksumVector {
        name: "CRC-8 poly=0x13 init=0x00",
        checksum: ChecksumDescriptor::crc8(0x13, 0x00),
        input: CHECK_INPUT,
        expected: 0x0B,
    },
    // BMW Gen4/5 parameters
    ChecksumVector {
        name: "CRC-8 poly=0x2F init=0xAA",
        checksum: ChecksumDescriptor::crc8(0x2F, 0xAA),
        input: COUNTING_INPUT,
        expected: 0x9D,
    },
];

pub const FORMULA_VECTORS: [FormulaVector; 9] = [
    FormulaVector {
        name: "PMV-107J pressure",
        formula: PMV107J_PRESSURE,
        raw: 132,
        expected: 228.16,
    },
    FormulaVector {
        name: "Elantra2012 pressure",
        formula: ELANTRA2012_PRESSURE,
        raw: 2,
        expected: 62.0,
    },
    FormulaVector {
        name: "Schrader GEN1 pressure",
        formula: SCHRADER_PRESSURE,
        raw: 0,
        expected: 0.0,
    },
    FormulaVector {
        name: "Schrader SMD3MA4 pressure",
        formula: SMD3MA4_PRESSURE,
        raw: 164,
        expected: 32.8,
    },
    FormulaVector {
        name: "Ford pressure",
        formula: FORD_PRESSURE,
        raw: 106,
        expected: 26.5,
    },
    FormulaVector {
        name: "BMW Gen4/5 pressure",
        formula: BMW_GEN45_PRESSURE,
        raw: 100,
        expected: 245.0,
    },
    FormulaVector {
        name: "BMW Gen2/3 pressure",
        formula: BMW_GEN23_PRESSURE,
        raw: 143,
        expected: 250.0,
    },
    FormulaVector {
        name: "Porsche pressure",
        formula: PORSCHE_PRESSURE,
        raw: 140,
        expected: 250.0,
    },
    FormulaVector {
        name: "GM aftermarket pressure",
        formula: GM_AFTERMARKET_PRESSURE,
        raw: 80,
        expected: 220.0,
    },
];

/// Raw code used to compare the two EG53MA4 scale hypotheses
pub const EG53MA4_COMPARISON_RAW: i64 = 100;

/// Check every checksum vector, then run each registry checksum
pub fn run_checksum_vectors() -> Vec<ValidationOutcome> {
    let mut outcomes: Vec<ValidationOutcome> = CHECKSUM_VECTORS.iter().map(check_checksum).collect();
    outcomes.extend(run_registry_checksums());
    outcomes
}

fn check_checksum(vector: &ChecksumVector) -> ValidationOutcome {
    let actual = vector.checksum.compute(vector.input);
    if actual == vector.expected {
        ValidationOutcome::pass(format!(
            "{} over {}: 0x{:X}",
            vector.name,
            describe_input(vector.input),
            actual
        ))
    } else {
        ValidationOutcome::fail(format!(
            "{} over {}: 0x{:X}, expected 0x{:X}",
            vector.name,
            describe_input(vector.input),
            actual,
            vector.expected
        ))
    }
}

fn describe_input(input: &[u8]) -> String {
    match std::str::from_utf8(input) {
        Ok(text) if text.chars().all(|c| c.is_ascii_graphic()) => format!("\"{}\"", text),
        _ => format!("{} bytes {:02X?}", input.len(), input),
    }
}

/// Run every registry checksum descriptor over [`CHECK_INPUT`]
///
/// Records carry no payload bytes, so these are informational: each entry
/// reports its parameters and the value its engine produces.
pub fn run_registry_checksums() -> Vec<ValidationOutcome> {
    all_specs()
        .filter_map(|spec| {
            spec.checksum.map(|checksum| {
                ValidationOutcome::pass(format!(
                    "{} checksum params: {} -> 0x{:02X} over \"123456789\"",
                    spec.label,
                    checksum,
                    checksum.compute(CHECK_INPUT)
                ))
            })
        })
        .collect()
}

/// Check every formula vector in both directions
pub fn run_formula_vectors(tolerance: f64) -> Vec<ValidationOutcome> {
    FORMULA_VECTORS
        .iter()
        .map(|v| check_formula(v, tolerance))
        .collect()
}

fn check_formula(vector: &FormulaVector, tolerance: f64) -> ValidationOutcome {
    let forward = vector.formula.forward(vector.raw);
    let inverse = vector.formula.inverse(vector.expected);

    if (forward - vector.expected).abs() > tolerance {
        ValidationOutcome::fail(format!(
            "{}: raw {} gives {:.3} {}, expected {}",
            vector.name, vector.raw, forward, vector.formula.unit, vector.expected
        ))
    } else if inverse != vector.raw {
        ValidationOutcome::fail(format!(
            "{}: {} {} inverts to raw {}, expected {}",
            vector.name, vector.expected, vector.formula.unit, inverse, vector.raw
        ))
    } else {
        ValidationOutcome::pass(format!(
            "{}: raw {} <-> {} {}",
            vector.name, vector.raw, vector.expected, vector.formula.unit
        ))
    }
}

/// Informational comparison of the two EG53MA4 pressure scales
///
/// Always a pass: the disagreement between decoders is documented, not
/// resolved.
pub fn eg53ma4_comparison() -> ValidationOutcome {
    let raw = EG53MA4_COMPARISON_RAW;
    let reference = EG53MA4_PRESSURE_REFERENCE.forward(raw);
    let native = EG53MA4_PRESSURE_NATIVE.forward(raw);

    ValidationOutcome::pass(format!(
        "Schrader-EG53MA4 raw {}: {:.1} kPa (factor {}) vs {:.1} kPa (factor {}), decoders differ by {:.1} kPa",
        raw,
        reference,
        EG53MA4_PRESSURE_REFERENCE.scale,
        native,
        EG53MA4_PRESSURE_NATIVE.scale,
        (native - reference).abs()
    ))
}

/// Run every self-test vector in a fixed order
pub fn run_all(tolerance: f64) -> Vec<ValidationOutcome> {
    let mut outcomes = run_checksum_vectors();
    outcomes.extend(run_formula_vectors(tolerance));
    outcomes.push(eg53ma4_comparison());
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::DEFAULT_TOLERANCE;

    #[test]
    fn test_all_checksum_vectors_pass() {
        let outcomes = run_checksum_vectors();
        let with_checksum = all_specs().filter(|s| s.checksum.is_some()).count();
        assert_eq!(outcomes.len(), CHECKSUM_VECTORS.len() + with_checksum);
        assert!(outcomes.iter().all(|o| o.is_pass()), "{:?}", outcomes);
    }

    #[test]
    fn test_vendor_polynomials() {
        let outcomes = run_checksum_vectors();
        assert!(outcomes
            .iter()
            .any(|o| o.message == "CRC-8 poly=0x13 init=0x00 over \"123456789\": 0xB"));
        assert!(outcomes.iter().any(|o| o.message.starts_with("CRC-8 poly=0x2F init=0xAA over 10 bytes")
            && o.message.ends_with(": 0x9D")));
    }

    #[test]
    fn test_registry_checksums_reported() {
        let outcomes = run_registry_checksums();
        let messages: Vec<&str> = outcomes.iter().map(|o| o.message.as_str()).collect();

        // every registry entry but Schrader SMD3MA4 documents a checksum
        assert_eq!(messages.len(), 8);
        assert_eq!(
            messages[0],
            "PMV-107J checksum params: CRC-8 poly=0x13 init=0x00 over 8 bytes -> 0xB9 over \"123456789\""
        );
        assert!(messages.iter().any(|m| m.starts_with("Elantra2012 ") && m.contains("-> 0x78 ")));
        assert!(messages.iter().any(|m| m.starts_with("Ford ") && m.contains("SUM-8 over 7 bytes -> 0x6C")));
        assert!(messages.iter().any(|m| m.starts_with("Schrader GEN1 ") && m.contains("-> 0x52 ")));
        assert!(messages.iter().any(|m| m.starts_with("Schrader EG53MA4 ") && m.contains("-> 0xDD ")));
        assert!(messages.iter().any(|m| m.starts_with("Toyota EU ") && m.contains("init=0x80 -> 0xC0 ")));
        assert!(messages.iter().any(|m| m.starts_with("Renault ") && m.contains("-> 0xF4 ")));
        assert!(messages.iter().any(|m| m.starts_with("Citroen ") && m.contains("XOR-8 -> 0x31 ")));
        assert!(!messages.iter().any(|m| m.contains("SMD3MA4")));
    }

    #[test]
    fn test_all_formula_vectors_pass() {
        let outcomes = run_formula_vectors(DEFAULT_TOLERANCE);
        assert!(outcomes.iter().all(|o| o.is_pass()), "{:?}", outcomes);
    }

    #[test]
    fn test_wrong_expectation_fails() {
        let vector = FormulaVector {
            name: "broken",
            formula: FORD_PRESSURE,
            raw: 106,
            expected: 27.0,
        };
        let outcome = check_formula(&vector, DEFAULT_TOLERANCE);
        assert!(outcome.is_fail());
        assert!(outcome.message.contains("raw 106 gives 26.500"));

        let vector = ChecksumVector {
            name: "CRC-8 wrong seed",
            checksum: ChecksumDescriptor::crc8(0x07, 0xFF),
            input: CHECK_INPUT,
            expected: 0xF4,
        };
        assert!(check_checksum(&vector).is_fail());
    }

    #[test]
    fn test_eg53ma4_comparison_is_informational() {
        let outcome = eg53ma4_comparison();
        assert!(outcome.is_pass());
        assert!(outcome.message.contains("250.0 kPa"));
        assert!(outcome.message.contains("275.0 kPa"));
        assert!(outcome.message.contains("differ by 25.0"));
    }

    #[test]
    fn test_run_all_order() {
        let outcomes = run_all(DEFAULT_TOLERANCE);
        assert_eq!(
            outcomes.len(),
            run_checksum_vectors().len() + FORMULA_VECTORS.len() + 1
        );
        assert!(outcomes[0].message.starts_with("CRC-8"));
        assert!(outcomes.last().unwrap().message.starts_with("Schrader-EG53MA4"));
    }
}
