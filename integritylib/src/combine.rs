//! Concatenation of several Intel HEX files into one, used to bundle a
//! bootloader image with an application image.

use crate::error::ImageError;
use crate::record::HexRecord;
use std::error::Error;
use std::path::Path;

/// The EOF record terminating the combined file.
const EOF_RECORD: &str = ":00000001FF";

/// Combine several hex files into one.
///
/// Only data, extended segment address and extended linear address records
/// are carried through, verbatim and in source order; per-source EOF records
/// are dropped and a single EOF record is appended at the end. Every line of
/// every source must still parse - a malformed source aborts the whole
/// combine and nothing is written to `target`.
///
/// # Errors
/// Returns an error if a source cannot be read or contains a malformed
/// record, or if `target` cannot be written.
///
/// # Example
/// ```no_run
/// use integritylib::combine_hex_files;
///
/// combine_hex_files("combined.hex", &["bootloader.hex", "application.hex"]).unwrap();
/// ```
pub fn combine_hex_files<P: AsRef<Path>, S: AsRef<Path>>(
    target: P,
    sources: &[S],
) -> Result<(), Box<dyn Error>> {
    let mut combined = String::new();

    for source in sources {
        let text = std::fs::read_to_string(source)?;
        for (idx, line) in text.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }

            let record = HexRecord::parse(line)
                .map_err(|kind| ImageError::ParseRecordError(kind, idx + 1))?;

            if record.is_data() || record.is_segment_address() || record.is_linear_address() {
                combined.push_str(line);
                combined.push('\n');
            }
        }
    }

    combined.push_str(EOF_RECORD);
    combined.push('\n');

    // Ensure the parent directory exists
    if let Some(parent) = target.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(target, combined)?;

    Ok(())
}
