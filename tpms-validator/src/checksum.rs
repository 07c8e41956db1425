//! Checksum engine
//!
//! Bit-serial CRC-8 / CRC-16 and the byte-wise additive and XOR checksums used
//! by TPMS sensor protocols. All functions are pure and accept any byte slice,
//! including an empty one (which returns the seed unchanged).
//!
//! The CRCs are MSB-first, non-reflected, with no final XOR. That matches the
//! sensor firmware conventions, so for example CRC-8 with poly 0x07 / init 0x00
//! is CRC-8/SMBUS and CRC-16 with poly 0x1021 / init 0xFFFF is CRC-16/CCITT-FALSE.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CRC-8, MSB-first, seeded with `init`
pub fn crc8(data: &[u8], init: u8, poly: u8) -> u8 {
    let mut crc = init;

    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ poly;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}

/// CRC-16, MSB-first, seeded with `init`
///
/// Each input byte is XORed into the high byte of the register before the
/// eight shift iterations.
pub fn crc16(data: &[u8], init: u16, poly: u16) -> u16 {
    let mut crc = init;

    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ poly;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}

/// Additive checksum: sum of all bytes mod 256
pub fn sum_checksum(data: &[u8], init: u8) -> u8 {
    data.iter().fold(init, |acc, &b| acc.wrapping_add(b))
}

/// XOR checksum over all bytes
pub fn xor_checksum(data: &[u8], init: u8) -> u8 {
    data.iter().fold(init, |acc, &b| acc ^ b)
}

/// Checksum algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecksumKind {
    /// 8-bit CRC
    Crc8,
    /// 16-bit CRC
    Crc16,
    /// Additive sum mod 256
    Sum8,
    /// Byte-wise XOR
    Xor8,
}

impl fmt::Display for ChecksumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumKind::Crc8 => write!(f, "CRC-8"),
            ChecksumKind::Crc16 => write!(f, "CRC-16"),
            ChecksumKind::Sum8 => write!(f, "SUM-8"),
            ChecksumKind::Xor8 => write!(f, "XOR-8"),
        }
    }
}

/// Checksum parameters a protocol documents
///
/// Descriptive metadata: decoded records carry no raw payload, so nothing in
/// the validation pipeline checksums live bytes. `compute` runs the engine
/// with these parameters for self-tests and callers holding raw frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumDescriptor {
    /// Algorithm family
    pub kind: ChecksumKind,
    /// Generator polynomial (unused for sum/XOR)
    pub poly: u16,
    /// Initial register value
    pub init: u16,
    /// Number of leading payload bytes covered, when the protocol fixes it
    pub span: Option<usize>,
}

impl ChecksumDescriptor {
    /// CRC-8 with the given polynomial and seed
    pub const fn crc8(poly: u8, init: u8) -> Self {
        Self {
            kind: ChecksumKind::Crc8,
            poly: poly as u16,
            init: init as u16,
            span: None,
        }
    }

    /// CRC-16 with the given polynomial and seed
    pub const fn crc16(poly: u16, init: u16) -> Self {
        Self {
            kind: ChecksumKind::Crc16,
            poly,
            init,
            span: None,
        }
    }

    /// Additive sum over the first `span` bytes
    pub const fn sum8(span: usize) -> Self {
        Self {
            kind: ChecksumKind::Sum8,
            poly: 0,
            init: 0,
            span: Some(span),
        }
    }

    /// XOR over the first `span` bytes
    pub const fn xor8(span: usize) -> Self {
        Self {
            kind: ChecksumKind::Xor8,
            poly: 0,
            init: 0,
            span: Some(span),
        }
    }

    /// Restrict the checksum to the first `span` bytes
    pub const fn with_span(mut self, span: usize) -> Self {
        self.span = Some(span);
        self
    }

    /// Compute the checksum over `data`, honoring `span` when set
    ///
    /// Data shorter than `span` is checksummed as-is.
    pub fn compute(&self, data: &[u8]) -> u16 {
        let covered = match self.span {
            Some(span) => &data[..span.min(data.len())],
            None => data,
        };

        match self.kind {
            ChecksumKind::Crc8 => crc8(covered, self.init as u8, self.poly as u8) as u16,
            ChecksumKind::Crc16 => crc16(covered, self.init, self.poly),
            ChecksumKind::Sum8 => sum_checksum(covered, self.init as u8) as u16,
            ChecksumKind::Xor8 => xor_checksum(covered, self.init as u8) as u16,
        }
    }
}

impl fmt::Display for ChecksumDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ChecksumKind::Crc8 => write!(f, "{} poly=0x{:02X} init=0x{:02X}", self.kind, self.poly, self.init)?,
            ChecksumKind::Crc16 => write!(f, "{} poly=0x{:04X} init=0x{:04X}", self.kind, self.poly, self.init)?,
            ChecksumKind::Sum8 | ChecksumKind::Xor8 => write!(f, "{}", self.kind)?,
        }
        if let Some(span) = self.span {
            write!(f, " over {} bytes", span)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECK_INPUT: &[u8] = b"123456789";

    #[test]
    fn test_crc8_standard_vector() {
        assert_eq!(crc8(CHECK_INPUT, 0x00, 0x07), 0xF4);
    }

    #[test]
    fn test_crc16_standard_vectors() {
        assert_eq!(crc16(CHECK_INPUT, 0x0000, 0x1021), 0x31C3);
        assert_eq!(crc16(CHECK_INPUT, 0xFFFF, 0x1021), 0x29B1);
    }

    #[test]
    fn test_empty_input_returns_seed() {
        assert_eq!(crc8(&[], 0xAA, 0x2F), 0xAA);
        assert_eq!(crc16(&[], 0xFFFF, 0x1021), 0xFFFF);
        assert_eq!(sum_checksum(&[], 0x12), 0x12);
        assert_eq!(xor_checksum(&[], 0x34), 0x34);
    }

    #[test]
    fn test_sum_wraps_mod_256() {
        assert_eq!(sum_checksum(CHECK_INPUT, 0), 0xDD);
        assert_eq!(sum_checksum(&[0xFF, 0x02], 0), 0x01);
    }

    #[test]
    fn test_xor_checksum() {
        assert_eq!(xor_checksum(CHECK_INPUT, 0), 0x31);
        assert_eq!(xor_checksum(&[0xA5, 0xA5], 0), 0x00);
    }

    #[test]
    fn test_crc_residue_is_zero() {
        // Appending the CRC big-endian leaves a zero register, which is how
        // the BMW Gen2/3 and Porsche decoders check whole frames.
        let crc = crc16(CHECK_INPUT, 0xFFFF, 0x1021);
        let mut frame = CHECK_INPUT.to_vec();
        frame.extend_from_slice(&crc.to_be_bytes());
        assert_eq!(crc16(&frame, 0xFFFF, 0x1021), 0);
    }

    #[test]
    fn test_descriptor_compute_respects_span() {
        let frame = [1u8, 2, 3, 4, 5, 6, 7, 28, 0xFF];
        let ford = ChecksumDescriptor::sum8(7);
        assert_eq!(ford.compute(&frame), 28);

        let elantra = ChecksumDescriptor::crc8(0x07, 0x00);
        assert_eq!(elantra.compute(CHECK_INPUT), 0xF4);

        let short = ChecksumDescriptor::xor8(16);
        assert_eq!(short.compute(&[0x0F, 0xF0]), 0xFF);
    }

    #[test]
    fn test_descriptor_display() {
        assert_eq!(
            ChecksumDescriptor::crc8(0x13, 0x00).to_string(),
            "CRC-8 poly=0x13 init=0x00"
        );
        assert_eq!(ChecksumDescriptor::sum8(9).to_string(), "SUM-8 over 9 bytes");
        assert_eq!(
            ChecksumDescriptor::crc16(0x1021, 0xFFFF).with_span(8).to_string(),
            "CRC-16 poly=0x1021 init=0xFFFF over 8 bytes"
        );
    }
}
