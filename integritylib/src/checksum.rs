//! CRC32 matching the target microcontroller's hardware CRC peripheral.

use crc32fast::Hasher;

/// Initial CRC register value, matching the peripheral's reset state.
pub const CRC_INITIAL: u32 = 0xFFFF_FFFF;

/// CRC32 (Ethernet/IEEE 802.3 polynomial) of `buffer`, continued from
/// [`CRC_INITIAL`] in the zlib convention.
///
/// The result must equal the CRC peripheral's register after the device
/// feeds it the same bytes, so neither the seed nor the output conditioning
/// may change: most general-purpose CRC32 implementations seed at 0 or
/// invert the final value and will disagree with the bootloader's check.
/// `Hasher::new_with_initial` is exactly zlib's "continue from a previous
/// value", which is how the convention is defined here.
#[must_use]
pub fn crc32(buffer: &[u8]) -> u32 {
    let mut hasher = Hasher::new_with_initial(CRC_INITIAL);
    hasher.update(buffer);
    hasher.finalize()
}
