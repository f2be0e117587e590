use integritylib::combine_hex_files;
use std::env;
use std::process;

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");

    println!("hexcombine v{version} - combine multiple hex files into one");
    println!("\nUsage:");
    println!("  hexcombine <output> <input1> ... <inputN>");
    println!("\nExamples:");
    println!("  hexcombine combined.hex bootloader.hex application.hex");
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

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    // Guard: need an output path and at least one input
    if args.len() < 3 {
        return Err("Usage: hexcombine <output> <input1> ... <inputN>".into());
    }

    let target = &args[1];
    let sources = &args[2..];

    combine_hex_files(target, sources)?;

    println!("Combined {} file(s) into {target}", sources.len());
    Ok(())
}
