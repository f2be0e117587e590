//! The `error` module defines [`ImageError`], the errors that can occur while
//! rebuilding a memory image from a firmware file. It carries two pieces of
//! information for parse failures:
//! 1. What kind of error was encountered (via [`RecordErrorKind`]).
//! 2. The line number in the hex file at which parsing failed.

use std::error::Error;
use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum ImageError {
    /// A hex file line failed to parse (kind + 1-based line number)
    ParseRecordError(RecordErrorKind, usize),
    /// Requested start address precedes a binary file's base load address
    StartBeforeBase {
        start_address: u32,
        base_address: u32,
    },
    /// Input file extension is neither `.hex` nor `.bin`
    UnsupportedExtension(String),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseRecordError(base_err, line) => {
                write!(
                    f,
                    "Error encountered during record parsing at line #{line} of the hex file:\n{base_err}",
                )
            }
            Self::StartBeforeBase {
                start_address,
                base_address,
            } => {
                write!(
                    f,
                    "Start address 0x{start_address:X} precedes the binary's base address 0x{base_address:X}",
                )
            }
            Self::UnsupportedExtension(path) => {
                write!(f, "Unsupported input extension (expected .hex or .bin): {path}")
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum RecordErrorKind {
    /// Record does not begin with a ':'
    MissingStartCode,
    /// Record does not match the `:BBAAAATT[DD...]CC` syntax
    PatternMismatch(String),
    /// Record's byte count field disagrees with its payload length
    LengthMismatch(usize, usize),
    /// Extended segment/linear address record without a 2-byte payload
    OffsetPayloadLength(usize),
    /// Record checksum mismatch
    ChecksumMismatch(u8, u8),
}

impl fmt::Display for RecordErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStartCode => {
                write!(f, "Missing start code ':'")
            }
            Self::PatternMismatch(line) => {
                write!(f, "'{line}' is not a valid hex file formatted line")
            }
            Self::LengthMismatch(declared, actual) => {
                write!(
                    f,
                    "Record declares {declared} data byte(s), found {actual}"
                )
            }
            Self::OffsetPayloadLength(actual) => {
                write!(
                    f,
                    "Address offset record must carry a 2-byte payload, found {actual}"
                )
            }
            Self::ChecksumMismatch(expected, actual) => {
                write!(
                    f,
                    "Invalid record checksum - expected: 0x{expected:02X}, found: 0x{actual:02X}"
                )
            }
        }
    }
}

impl Error for ImageError {}
impl Error for RecordErrorKind {}
