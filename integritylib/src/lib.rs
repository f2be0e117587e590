//! # `integritylib`
//!
//! Core library of the firmware integrity descriptor generator. It rebuilds
//! the flat memory image a target microcontroller sees from a compiled
//! firmware file (Intel HEX or raw binary), computes the CRC32 the device's
//! hardware CRC unit would produce over the same bytes, and serializes the
//! fixed-layout trailer a bootloader checks at boot before jumping to the
//! application.
//!
//! The library provides:
//! - Intel HEX record parsing (via [`HexRecord`]).
//! - Flat image reconstruction from HEX or raw binary input (via
//!   [`ImageSource`] and [`MemoryImage`]).
//! - The hardware-convention CRC32 (via [`crc32`]).
//! - The serialized integrity trailer (via [`FirmwareIntegrityRecord`]).
//!
//! ## Example
//!
//! ```
//! use integritylib::{FirmwareIntegrityRecord, ImageSource};
//!
//! let source = ImageSource::from_path("tests/fixtures/app.hex", 0x0800_8000).unwrap();
//! let image = source.build(0x0800_8000).unwrap();
//! let record = FirmwareIntegrityRecord::from_image(&image, "heater-shaker");
//! assert_eq!(record.serialize().len(), 12 + "heater-shaker".len() + 1);
//! ```

mod checksum;
mod combine;
mod error;
mod image;
mod record;
mod trailer;

// Public APIs
pub use checksum::{CRC_INITIAL, crc32};
pub use combine::combine_hex_files;
pub use error::{ImageError, RecordErrorKind};
pub use image::{FILL_BYTE, ImageSource, MemoryImage, build_binary_image, build_hex_image};
pub use record::{HexRecord, RecordType};
pub use trailer::FirmwareIntegrityRecord;
