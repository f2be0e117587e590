//! The `trailer` module defines [`FirmwareIntegrityRecord`], the small
//! fixed-layout descriptor a bootloader reads at boot to verify the
//! application image.

use crate::checksum::crc32;
use crate::image::MemoryImage;

/// Integrity descriptor for one firmware image.
///
/// Serialized layout (bit-exact contract with the startup app; there is no
/// version field, so a change here requires a coordinated firmware update):
///
/// ```text
/// offset 0:  u32 LE  CRC32
/// offset 4:  u32 LE  byte count included in the CRC
/// offset 8:  u32 LE  absolute start address of the first included byte
/// offset 12: bytes   ASCII device/module name
/// then:      u8      0x00 terminator
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareIntegrityRecord {
    pub crc: u32,
    pub size: u32,
    pub start_address: u32,
    /// Short ASCII identifier for the device/module, stored null-terminated
    pub name: String,
}

impl FirmwareIntegrityRecord {
    /// Checksum `image` and bundle the result with its metadata.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn from_image(image: &MemoryImage, name: &str) -> Self {
        Self {
            crc: crc32(image.as_bytes()),
            size: image.len() as u32,
            start_address: image.start_address(),
            name: name.to_string(),
        }
    }

    /// Pack the record into its on-flash byte layout.
    ///
    /// Total length is `12 + name.len() + 1` bytes. The name is emitted
    /// verbatim with no length prefix; keeping it ASCII and free of embedded
    /// NUL bytes is the caller's responsibility.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(12 + self.name.len() + 1);
        out.extend_from_slice(&self.crc.to_le_bytes());
        out.extend_from_slice(&self.size.to_le_bytes());
        out.extend_from_slice(&self.start_address.to_le_bytes());
        out.extend_from_slice(self.name.as_bytes());
        out.push(0x00);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::build_binary_image;

    #[test]
    fn test_serialize_byte_exact() {
        // Arrange
        let record = FirmwareIntegrityRecord {
            crc: 0x1234_5678,
            size: 1024,
            start_address: 0x0800_8000,
            name: "TD".to_string(),
        };

        // Act
        let bytes = record.serialize();

        // Assert
        assert_eq!(
            bytes,
            [
                0x78, 0x56, 0x34, 0x12, // crc, little-endian
                0x00, 0x04, 0x00, 0x00, // size = 1024
                0x00, 0x80, 0x00, 0x08, // start address
                0x54, 0x44, // "TD"
                0x00, // terminator
            ]
        );
        assert_eq!(bytes.len(), 12 + 2 + 1);
    }

    #[test]
    fn test_from_image() {
        // Arrange - four bytes of erased flash at address 0
        let image = build_binary_image(&[0xFF; 4], 0, 0).unwrap();

        // Act
        let record = FirmwareIntegrityRecord::from_image(&image, "tempdeck");

        // Assert
        assert_eq!(record.crc, 0x2144_DF1C);
        assert_eq!(record.size, 4);
        assert_eq!(record.start_address, 0);
        assert_eq!(record.name, "tempdeck");
    }

    #[test]
    fn test_serialize_empty_name() {
        // Arrange
        let record = FirmwareIntegrityRecord {
            crc: 0,
            size: 0,
            start_address: 0,
            name: String::new(),
        };

        // Act
        let bytes = record.serialize();

        // Assert - twelve field bytes plus the lone terminator
        assert_eq!(bytes.len(), 13);
        assert_eq!(bytes[12], 0x00);
    }
}
