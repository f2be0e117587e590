//! The `record` module defines [`HexRecord`] and [`RecordType`], the parsed
//! form of a single Intel HEX line.

use crate::error::RecordErrorKind;
use regex::Regex;
use std::sync::OnceLock;

/// Record layout: `:BBAAAATT[DD...]CC`, uppercase hex digits only.
const RECORD_PATTERN: &str =
    r"^:([0-9A-F]{2})([0-9A-F]{4})([0-9A-F]{2})([0-9A-F]*)([0-9A-F]{2})$";

fn record_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Pattern is a valid literal - assume safe unwrap
    RE.get_or_init(|| Regex::new(RECORD_PATTERN).unwrap())
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordType {
    Data,
    EndOfFile,
    ExtendedSegmentAddress,
    ExtendedLinearAddress,
    /// Recognized syntactically, treated as a no-op by the image builder
    Other(u8),
}

impl RecordType {
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => Self::Data,
            0x01 => Self::EndOfFile,
            0x02 => Self::ExtendedSegmentAddress,
            0x04 => Self::ExtendedLinearAddress,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Data => 0x00,
            Self::EndOfFile => 0x01,
            Self::ExtendedSegmentAddress => 0x02,
            Self::ExtendedLinearAddress => 0x04,
            Self::Other(byte) => byte,
        }
    }
}

/// One parsed line of an Intel HEX file. Constructed per line and consumed
/// immediately by the image builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexRecord {
    /// Number of data bytes declared by the record
    pub byte_count: u8,
    /// 16-bit address field as written (meaning depends on the record type)
    pub address: u16,
    pub record_type: RecordType,
    /// Raw bytes decoded from the hex digit string
    pub payload: Vec<u8>,
    /// The record's own checksum byte, captured but not validated here
    pub checksum: u8,
}

impl HexRecord {
    /// Parse one text line (trailing newline already stripped) into a record.
    ///
    /// Only the format of the line is checked; the per-record checksum byte
    /// is stored untouched. Use [`HexRecord::verify_checksum`] for the
    /// stricter mode.
    ///
    /// # Errors
    /// Returns a [`RecordErrorKind`] if the line does not match the Intel HEX
    /// syntax or its byte count disagrees with the payload length.
    pub fn parse(line: &str) -> Result<Self, RecordErrorKind> {
        // Check for start code
        if !line.starts_with(':') {
            return Err(RecordErrorKind::MissingStartCode);
        }

        let caps = record_regex()
            .captures(line)
            .ok_or_else(|| RecordErrorKind::PatternMismatch(line.to_string()))?;

        // Hex digit ranges are guaranteed by the pattern - assume safe unwraps
        let byte_count = u8::from_str_radix(&caps[1], 16).unwrap();
        let address = u16::from_str_radix(&caps[2], 16).unwrap();
        let type_byte = u8::from_str_radix(&caps[3], 16).unwrap();
        let checksum = u8::from_str_radix(&caps[5], 16).unwrap();

        // The byte count field is redundant with the payload length; a
        // disagreement means a corrupted or truncated line
        let payload_digits = &caps[4];
        if payload_digits.len() != usize::from(byte_count) * 2 {
            return Err(RecordErrorKind::LengthMismatch(
                usize::from(byte_count),
                payload_digits.len() / 2,
            ));
        }

        let mut payload = Vec::with_capacity(usize::from(byte_count));
        for i in (0..payload_digits.len()).step_by(2) {
            let byte = u8::from_str_radix(&payload_digits[i..i + 2], 16).unwrap();
            payload.push(byte);
        }

        let record_type = RecordType::from_byte(type_byte);

        // Extended address records carry exactly one 16-bit word
        if matches!(
            record_type,
            RecordType::ExtendedSegmentAddress | RecordType::ExtendedLinearAddress
        ) && payload.len() != 2
        {
            return Err(RecordErrorKind::OffsetPayloadLength(payload.len()));
        }

        Ok(Self {
            byte_count,
            address,
            record_type,
            payload,
            checksum,
        })
    }

    #[must_use]
    pub const fn is_data(&self) -> bool {
        matches!(self.record_type, RecordType::Data)
    }

    #[must_use]
    pub const fn is_segment_address(&self) -> bool {
        matches!(self.record_type, RecordType::ExtendedSegmentAddress)
    }

    #[must_use]
    pub const fn is_linear_address(&self) -> bool {
        matches!(self.record_type, RecordType::ExtendedLinearAddress)
    }

    /// Offset contributed by an extended segment address record
    /// (stored 16-bit word x 16). Only meaningful when
    /// [`HexRecord::is_segment_address`] holds.
    #[must_use]
    pub fn segment_address_value(&self) -> u32 {
        u32::from(u16::from_be_bytes([self.payload[0], self.payload[1]])) * 16
    }

    /// Offset contributed by an extended linear address record
    /// (stored 16-bit word shifted left 16). Only meaningful when
    /// [`HexRecord::is_linear_address`] holds.
    #[must_use]
    pub fn linear_address_value(&self) -> u32 {
        u32::from(u16::from_be_bytes([self.payload[0], self.payload[1]])) << 16
    }

    /// Recompute the two's-complement record checksum over byte count,
    /// address, type and payload and compare it with the stored byte.
    ///
    /// The image builder does not call this; it checks format only, matching
    /// the behavior of the toolchain this replaces.
    ///
    /// # Errors
    /// Returns [`RecordErrorKind::ChecksumMismatch`] when they disagree.
    pub fn verify_checksum(&self) -> Result<(), RecordErrorKind> {
        #[allow(clippy::cast_possible_truncation)]
        let mut sum = self
            .byte_count
            .wrapping_add((self.address >> 8) as u8)
            .wrapping_add((self.address & 0xFF) as u8)
            .wrapping_add(self.record_type.as_byte());
        for byte in &self.payload {
            sum = sum.wrapping_add(*byte);
        }
        let expected = (!sum).wrapping_add(1); // two's complement

        if expected == self.checksum {
            Ok(())
        } else {
            Err(RecordErrorKind::ChecksumMismatch(expected, self.checksum))
        }
    }
}
