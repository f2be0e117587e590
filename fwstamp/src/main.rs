use integritylib::{FirmwareIntegrityRecord, ImageSource};
use std::env;
use std::process;

/// Load address of a raw binary's first byte when `--base-address` is not
/// given: the application slot right after the bootloader region.
const DEFAULT_BIN_BASE_ADDRESS: u32 = 0x0800_8000;

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");

    println!("fwstamp v{version} - firmware integrity trailer generator");
    println!("\nUsage:");
    println!("  fwstamp <input> <name> <start> <output> [options]");
    println!("\nArguments:");
    println!("  input    .hex or .bin firmware image to read");
    println!("  name     ASCII device/module name embedded in the trailer");
    println!("  start    lowest address included in the CRC (0x-prefixed hex or decimal)");
    println!("  output   destination path for the serialized trailer");
    println!("\nOptions:");
    println!("  --base-address <val>   Load address of a .bin file's first byte");
    println!("                         (default: 0x08008000)");
    println!("\nExamples:");
    println!("  fwstamp heater-shaker.hex heater-shaker 0x08008400 integrity.bin");
    println!("  fwstamp tempdeck.bin tempdeck 0x08008400 info.bin --base-address 0x08008000");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args
        .iter()
        .skip(1)
        .any(|arg| arg == "help" || arg == "-h" || arg == "--help")
    {
        print_usage();
        return;
    }

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    // Guard: exactly four positional arguments
    let positionals = positional_args(args);
    let [input, name, start, output] = positionals.as_slice() else {
        return Err("Expected four arguments: <input> <name> <start> <output>".into());
    };

    // Guard: start address parses as hex or decimal
    let start_address =
        parse_address(start).map_err(|_| format!("Invalid start address: {start}"))?;

    // Guard: optional binary base address parses
    let base_address = match get_flag_value(args, "--base-address") {
        Some(value) => {
            parse_address(&value).map_err(|_| format!("Invalid base address: {value}"))?
        }
        None => DEFAULT_BIN_BASE_ADDRESS,
    };

    // Tag the input format once at the boundary
    let source = ImageSource::from_path(input.as_str(), base_address)?;

    println!("Reading from {input} starting at {start_address:#x}");

    let image = source.build(start_address)?;
    let record = FirmwareIntegrityRecord::from_image(&image, name.as_str());

    println!("  Program is {} bytes from start address", record.size);
    println!("  crc32 is {:#x}", record.crc);

    // The trailer is serialized fully in memory; the output file is only
    // touched once the whole pipeline has succeeded
    std::fs::write(output.as_str(), record.serialize())?;

    println!("Wrote to {output} successfully");
    Ok(())
}

// =============================== HELPER FUNCTIONS ===============================

/// Collect positional arguments, skipping flags and their values
fn positional_args(args: &[String]) -> Vec<&String> {
    let mut positionals = Vec::new();
    let mut skip_next = false;
    for arg in &args[1..] {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg.starts_with("--") {
            skip_next = true; // every flag takes one value
            continue;
        }
        positionals.push(arg);
    }
    positionals
}

/// Parse an address as `0x`-prefixed hex or plain decimal
fn parse_address(s: &str) -> Result<u32, std::num::ParseIntError> {
    let s = s.trim();

    if let Some(hex_str) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u32::from_str_radix(hex_str, 16);
    }

    s.parse()
}

/// Find the value after a specific flag (e.g., "--base-address 0x08008000")
fn get_flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_hex_and_decimal() {
        assert_eq!(parse_address("0x08008000"), Ok(0x0800_8000));
        assert_eq!(parse_address("0X10"), Ok(0x10));
        assert_eq!(parse_address("1024"), Ok(1024));
        assert!(parse_address("0xZZ").is_err());
        assert!(parse_address("ten").is_err());
    }

    #[test]
    fn test_positional_args_skip_flags() {
        // Arrange
        let args: Vec<String> = [
            "fwstamp",
            "app.bin",
            "tempdeck",
            "0x08008400",
            "out.bin",
            "--base-address",
            "0x08008000",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        // Act
        let positionals = positional_args(&args);

        // Assert
        assert_eq!(
            positionals,
            ["app.bin", "tempdeck", "0x08008400", "out.bin"]
        );
    }
}
