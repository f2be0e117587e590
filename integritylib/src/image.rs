//! The `image` module rebuilds the flat memory image a target device sees
//! from a firmware file.
//!
//! Intel HEX input goes through a two-pass reconstruction (sizing, then
//! population) because records are not guaranteed to appear in increasing
//! address order. Raw binary input is a straight slice starting at the
//! requested address. Both paths produce the same [`MemoryImage`].

use crate::error::ImageError;
use crate::record::HexRecord;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Fill value for addresses no data record covers, matching unprogrammed
/// flash.
pub const FILL_BYTE: u8 = 0xFF;

/// The reconstructed flat firmware image to be checksummed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryImage {
    start_address: u32,
    bytes: Vec<u8>,
}

impl MemoryImage {
    /// Absolute address of the first byte of the image.
    #[must_use]
    pub const fn start_address(&self) -> u32 {
        self.start_address
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Running extended-address state for one scan pass.
///
/// The segment and linear offsets are tracked independently and summed when
/// resolving a data record's absolute address; observing one record type
/// never clears the other. Real toolchains emit only one of the two schemes
/// per file, so the sum degenerates to whichever is in use.
#[derive(Debug, Default)]
struct OffsetState {
    segment: u32,
    linear: u32,
}

impl OffsetState {
    /// Absolute address of a data record under the current offsets.
    fn absolute(&self, record: &HexRecord) -> u64 {
        u64::from(record.address) + u64::from(self.segment) + u64::from(self.linear)
    }

    fn observe(&mut self, record: &HexRecord) {
        if record.is_segment_address() {
            self.segment = record.segment_address_value();
        } else if record.is_linear_address() {
            self.linear = record.linear_address_value();
        }
    }
}

/// Iterate the non-empty lines of a hex file as parsed records, tagging
/// failures with their 1-based line number.
fn parse_lines(text: &str) -> impl Iterator<Item = Result<HexRecord, ImageError>> + '_ {
    text.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(idx, line)| {
            HexRecord::parse(line).map_err(|kind| ImageError::ParseRecordError(kind, idx + 1))
        })
}

/// Rebuild the flat memory image described by an Intel HEX file.
///
/// Two passes over the lines: the first finds the highest end address of any
/// data record at or above `start_address` so the buffer can be allocated up
/// front (filled with [`FILL_BYTE`]); the second copies payload bytes in,
/// later records overwriting earlier ones. Each pass carries its own fresh
/// [`OffsetState`]. Data records whose absolute address falls below
/// `start_address` are dropped entirely: they neither contribute bytes nor
/// extend the buffer.
///
/// A file whose records all end at or below `start_address` yields a
/// zero-length image; that is not an error by itself, but almost certainly
/// indicates a wrong `start_address`.
///
/// # Errors
/// Any malformed line aborts the whole build with
/// [`ImageError::ParseRecordError`]; no partial image is ever returned.
pub fn build_hex_image(text: &str, start_address: u32) -> Result<MemoryImage, ImageError> {
    let start = u64::from(start_address);

    // Pass 1 - sizing
    let mut offsets = OffsetState::default();
    let mut max_end = start;
    for parsed in parse_lines(text) {
        let record = parsed?;
        if record.is_data() {
            let address = offsets.absolute(&record);
            if address >= start {
                max_end = max_end.max(address + record.payload.len() as u64);
            }
        } else {
            offsets.observe(&record);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    let size = (max_end - start) as usize;
    let mut bytes = vec![FILL_BYTE; size];

    // Pass 2 - population, with a fresh offset accumulator
    let mut offsets = OffsetState::default();
    for parsed in parse_lines(text) {
        let record = parsed?;
        if record.is_data() {
            let address = offsets.absolute(&record);
            if address < start {
                continue;
            }
            #[allow(clippy::cast_possible_truncation)]
            let offset = (address - start) as usize;
            bytes[offset..offset + record.payload.len()].copy_from_slice(&record.payload);
        } else {
            offsets.observe(&record);
        }
    }

    Ok(MemoryImage {
        start_address,
        bytes,
    })
}

/// Slice a raw binary image starting at `start_address`.
///
/// A raw binary has no internal addressing: every byte's address is its file
/// offset plus `base_address`, the address the linker placed the file's
/// first byte at. The reported start address is the absolute address
/// actually used (`base_address + skip`), so the serialized trailer always
/// reflects reality. A skip past the end of the file yields an empty image.
///
/// # Errors
/// Returns [`ImageError::StartBeforeBase`] if `start_address` precedes
/// `base_address`.
pub fn build_binary_image(
    data: &[u8],
    start_address: u32,
    base_address: u32,
) -> Result<MemoryImage, ImageError> {
    if start_address < base_address {
        return Err(ImageError::StartBeforeBase {
            start_address,
            base_address,
        });
    }

    let skip = (start_address - base_address) as usize;
    let bytes = data.get(skip..).unwrap_or_default().to_vec();

    Ok(MemoryImage {
        start_address,
        bytes,
    })
}

/// Input image, tagged by file extension once at the boundary. Both variants
/// expose the same image-building contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Hex { path: PathBuf },
    Binary { path: PathBuf, base_address: u32 },
}

impl ImageSource {
    /// Select the image-building strategy from the file extension
    /// (case-insensitive `.hex` / `.bin`). `base_address` applies to the
    /// binary path only.
    ///
    /// # Errors
    /// Returns [`ImageError::UnsupportedExtension`] for any other extension.
    pub fn from_path<P: AsRef<Path>>(path: P, base_address: u32) -> Result<Self, ImageError> {
        let path = path.as_ref();
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("hex"))
        {
            Ok(Self::Hex {
                path: path.to_path_buf(),
            })
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("bin"))
        {
            Ok(Self::Binary {
                path: path.to_path_buf(),
                base_address,
            })
        } else {
            Err(ImageError::UnsupportedExtension(
                path.display().to_string(),
            ))
        }
    }

    /// Read the input file and rebuild the flat memory image from
    /// `start_address` upward.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn build(&self, start_address: u32) -> Result<MemoryImage, Box<dyn Error>> {
        match self {
            Self::Hex { path } => {
                let text = std::fs::read_to_string(path)?;
                Ok(build_hex_image(&text, start_address)?)
            }
            Self::Binary { path, base_address } => {
                let data = std::fs::read(path)?;
                Ok(build_binary_image(&data, start_address, *base_address)?)
            }
        }
    }
}
