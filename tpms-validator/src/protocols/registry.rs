//! Fixed protocol formula registry
//!
//! One entry per supported TPMS protocol, keyed by the exact `model`
//! discriminator the decoders emit. The table is closed: dispatch goes through
//! the [`Protocol`] enum and every lookup is an exhaustive `match`.

use crate::checksum::{ChecksumDescriptor, ChecksumKind};
use crate::protocols::formula::{ConversionFormula, Unit};
use std::fmt;

/// PMV-107J: kPa = (raw - 40) * 2.48
pub const PMV107J_PRESSURE: ConversionFormula =
    ConversionFormula::new(Unit::Kilopascal, 2.48, -99.2, 8);
/// PMV-107J: C = raw - 40
pub const PMV107J_TEMPERATURE: ConversionFormula =
    ConversionFormula::new(Unit::Celsius, 1.0, -40.0, 8);

/// Elantra2012: kPa = raw + 60
pub const ELANTRA2012_PRESSURE: ConversionFormula =
    ConversionFormula::new(Unit::Kilopascal, 1.0, 60.0, 8);
/// Elantra2012: C = raw - 50
pub const ELANTRA2012_TEMPERATURE: ConversionFormula =
    ConversionFormula::new(Unit::Celsius, 1.0, -50.0, 8);

/// Ford: PSI = 0.25 * ((b6 & 0x20) << 3 | b4), a 9-bit combined code
pub const FORD_PRESSURE: ConversionFormula = ConversionFormula::new(Unit::Psi, 0.25, 0.0, 9);

/// Schrader GEN1: kPa = raw * 2.5
pub const SCHRADER_PRESSURE: ConversionFormula =
    ConversionFormula::new(Unit::Kilopascal, 2.5, 0.0, 8);
/// Schrader GEN1: C = raw - 50
pub const SCHRADER_TEMPERATURE: ConversionFormula =
    ConversionFormula::new(Unit::Celsius, 1.0, -50.0, 8);

/// Schrader EG53MA4 as the external reference decoder scales it: kPa = raw * 2.5
pub const EG53MA4_PRESSURE_REFERENCE: ConversionFormula =
    ConversionFormula::new(Unit::Kilopascal, 2.5, 0.0, 8);
/// Schrader EG53MA4 as our decoder scales it: kPa = raw * 2.75
pub const EG53MA4_PRESSURE_NATIVE: ConversionFormula =
    ConversionFormula::new(Unit::Kilopascal, 2.75, 0.0, 8);
/// Schrader EG53MA4: the raw byte is the temperature in F
pub const EG53MA4_TEMPERATURE: ConversionFormula =
    ConversionFormula::new(Unit::Fahrenheit, 1.0, 0.0, 8);

/// Schrader SMD3MA4: PSI = raw * 0.2, 10-bit field
pub const SMD3MA4_PRESSURE: ConversionFormula = ConversionFormula::new(Unit::Psi, 0.2, 0.0, 10);

/// What to do when a formula-checked field is absent from a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    /// Not counted at all
    Ignore,
    /// Counted as a skip
    Skip,
}

/// How one physical field of a protocol is validated
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRule {
    /// The protocol makes no claim about this field
    Unchecked,
    /// Round-trip the reading through a single formula
    Formula {
        formula: ConversionFormula,
        when_missing: Missing,
    },
    /// Two competing scale hypotheses: the reference decoder's and ours
    Competing {
        reference: ConversionFormula,
        native: ConversionFormula,
    },
    /// The first reading present among `units`, tried in order, is reported
    Reported { units: &'static [Unit] },
    /// The protocol has no such field; a reading is an error
    Forbidden,
}

impl FieldRule {
    const fn formula(formula: ConversionFormula) -> Self {
        FieldRule::Formula {
            formula,
            when_missing: Missing::Ignore,
        }
    }

    /// All formulas this rule carries
    pub fn formulas(&self) -> Vec<ConversionFormula> {
        match self {
            FieldRule::Formula { formula, .. } => vec![*formula],
            FieldRule::Competing { reference, native } => vec![*reference, *native],
            FieldRule::Unchecked | FieldRule::Reported { .. } | FieldRule::Forbidden => Vec::new(),
        }
    }
}

/// A complete protocol entry
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolSpec {
    /// Registry variant
    pub protocol: Protocol,
    /// Exact `model` string the decoders emit
    pub discriminator: &'static str,
    /// Human-readable name used in messages
    pub label: &'static str,
    /// Documented checksum, if the protocol has one
    pub checksum: Option<ChecksumDescriptor>,
    /// Pressure validation rule
    pub pressure: FieldRule,
    /// Temperature validation rule
    pub temperature: FieldRule,
}

/// Supported TPMS protocols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Protocol {
    /// Pacific PMV-107J (Toyota, Lexus)
    Pmv107j,
    /// Hyundai Elantra 2012 / Honda Civic (TRW)
    Elantra2012,
    /// Ford
    Ford,
    /// Schrader GEN1
    Schrader,
    /// Schrader EG53MA4
    SchraderEg53ma4,
    /// Schrader SMD3MA4 (Subaru, Infiniti, Nissan)
    SchraderSmd3ma4,
    /// Toyota EU (PMV-C210)
    Toyota,
    /// Renault
    Renault,
    /// Citroen / VDO
    Citroen,
}

static PMV107J: ProtocolSpec = ProtocolSpec {
    protocol: Protocol::Pmv107j,
    discriminator: "PMV-107J",
    label: "PMV-107J",
    checksum: Some(ChecksumDescriptor::crc8(0x13, 0x00).with_span(8)),
    pressure: FieldRule::formula(PMV107J_PRESSURE),
    temperature: FieldRule::formula(PMV107J_TEMPERATURE),
};

static ELANTRA2012: ProtocolSpec = ProtocolSpec {
    protocol: Protocol::Elantra2012,
    discriminator: "Elantra2012",
    label: "Elantra2012",
    checksum: Some(ChecksumDescriptor::crc8(0x07, 0x00).with_span(7)),
    pressure: FieldRule::formula(ELANTRA2012_PRESSURE),
    temperature: FieldRule::formula(ELANTRA2012_TEMPERATURE),
};

static FORD: ProtocolSpec = ProtocolSpec {
    protocol: Protocol::Ford,
    discriminator: "Ford",
    label: "Ford",
    checksum: Some(ChecksumDescriptor::sum8(7)),
    // learn-mode packets carry no pressure
    pressure: FieldRule::Formula {
        formula: FORD_PRESSURE,
        when_missing: Missing::Skip,
    },
    temperature: FieldRule::Unchecked,
};

static SCHRADER: ProtocolSpec = ProtocolSpec {
    protocol: Protocol::Schrader,
    discriminator: "Schrader",
    label: "Schrader GEN1",
    checksum: Some(ChecksumDescriptor::crc8(0x07, 0xF0)),
    pressure: FieldRule::formula(SCHRADER_PRESSURE),
    temperature: FieldRule::formula(SCHRADER_TEMPERATURE),
};

static SCHRADER_EG53MA4: ProtocolSpec = ProtocolSpec {
    protocol: Protocol::SchraderEg53ma4,
    discriminator: "Schrader-EG53MA4",
    label: "Schrader EG53MA4",
    checksum: Some(ChecksumDescriptor::sum8(9)),
    pressure: FieldRule::Competing {
        reference: EG53MA4_PRESSURE_REFERENCE,
        native: EG53MA4_PRESSURE_NATIVE,
    },
    temperature: FieldRule::formula(EG53MA4_TEMPERATURE),
};

static SCHRADER_SMD3MA4: ProtocolSpec = ProtocolSpec {
    protocol: Protocol::SchraderSmd3ma4,
    discriminator: "Schrader-SMD3MA4",
    label: "Schrader SMD3MA4",
    checksum: None,
    pressure: FieldRule::formula(SMD3MA4_PRESSURE),
    temperature: FieldRule::Forbidden,
};

static TOYOTA: ProtocolSpec = ProtocolSpec {
    protocol: Protocol::Toyota,
    discriminator: "Toyota",
    label: "Toyota EU",
    checksum: Some(ChecksumDescriptor::crc8(0x07, 0x80)),
    // PSI or kPa depending on sensor generation
    pressure: FieldRule::Reported {
        units: &[Unit::Psi, Unit::Kilopascal],
    },
    temperature: FieldRule::Reported {
        units: &[Unit::Celsius],
    },
};

static RENAULT: ProtocolSpec = ProtocolSpec {
    protocol: Protocol::Renault,
    discriminator: "Renault",
    label: "Renault",
    checksum: Some(ChecksumDescriptor::crc8(0x07, 0x00)),
    pressure: FieldRule::Reported {
        units: &[Unit::Kilopascal],
    },
    temperature: FieldRule::Reported {
        units: &[Unit::Celsius],
    },
};

static CITROEN: ProtocolSpec = ProtocolSpec {
    protocol: Protocol::Citroen,
    discriminator: "Citroen",
    label: "Citroen",
    checksum: Some(ChecksumDescriptor {
        kind: ChecksumKind::Xor8,
        poly: 0,
        init: 0,
        span: None,
    }),
    pressure: FieldRule::Reported {
        units: &[Unit::Kilopascal],
    },
    temperature: FieldRule::Reported {
        units: &[Unit::Celsius],
    },
};

impl Protocol {
    /// Every registry entry, in table order
    pub const ALL: [Protocol; 9] = [
        Protocol::Pmv107j,
        Protocol::Elantra2012,
        Protocol::Ford,
        Protocol::Schrader,
        Protocol::SchraderEg53ma4,
        Protocol::SchraderSmd3ma4,
        Protocol::Toyota,
        Protocol::Renault,
        Protocol::Citroen,
    ];

    /// Look up a protocol by exact discriminator
    pub fn from_model(model: &str) -> Option<Protocol> {
        match model {
            "PMV-107J" => Some(Protocol::Pmv107j),
            "Elantra2012" => Some(Protocol::Elantra2012),
            "Ford" => Some(Protocol::Ford),
            "Schrader" => Some(Protocol::Schrader),
            "Schrader-EG53MA4" => Some(Protocol::SchraderEg53ma4),
            "Schrader-SMD3MA4" => Some(Protocol::SchraderSmd3ma4),
            "Toyota" => Some(Protocol::Toyota),
            "Renault" => Some(Protocol::Renault),
            "Citroen" => Some(Protocol::Citroen),
            _ => None,
        }
    }

    /// The static registry entry for this protocol
    pub fn spec(&self) -> &'static ProtocolSpec {
        match self {
            Protocol::Pmv107j => &PMV107J,
            Protocol::Elantra2012 => &ELANTRA2012,
            Protocol::Ford => &FORD,
            Protocol::Schrader => &SCHRADER,
            Protocol::SchraderEg53ma4 => &SCHRADER_EG53MA4,
            Protocol::SchraderSmd3ma4 => &SCHRADER_SMD3MA4,
            Protocol::Toyota => &TOYOTA,
            Protocol::Renault => &RENAULT,
            Protocol::Citroen => &CITROEN,
        }
    }

    /// Exact `model` string for this protocol
    pub fn discriminator(&self) -> &'static str {
        self.spec().discriminator
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().label)
    }
}

/// Iterate over every registry entry
pub fn all_specs() -> impl Iterator<Item = &'static ProtocolSpec> {
    Protocol::ALL.iter().map(|p| p.spec())
}
