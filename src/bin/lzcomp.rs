//! lzcomp CLI - file compression tool
//!
//! A command-line interface for the lzcomp library.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};

use lzcomp::Options;

/// Extension appended to compressed files.
const EXTENSION: &str = "lz";

/// Lossless LZ77 + adaptive Huffman file compressor.
#[derive(Parser, Debug)]
#[command(name = "lzcomp")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Arena budget per call, in bytes
    #[arg(long, global = true, value_name = "BYTES")]
    memory_limit: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file
    Compress {
        /// Input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (defaults to INPUT.lz)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Decompress a file
    Decompress {
        /// Input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (defaults to INPUT without .lz)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Refuse streams declaring more than this many bytes
        #[arg(long, value_name = "BYTES")]
        max_output_size: Option<usize>,
    },
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default.into())
                .from_env_lossy(),
        )
        .init();
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = Options::default();
    if let Some(limit) = args.memory_limit {
        options = options.with_memory_limit(limit);
    }

    match args.command {
        Command::Compress { input, output } => {
            let output = output.unwrap_or_else(|| compressed_path(&input));
            let data = fs::read(&input)?;

            let start = Instant::now();
            let (encoded, stats) = lzcomp::compress_with_stats(&data, &options)?;
            let elapsed = start.elapsed();
            fs::write(&output, &encoded)?;

            if args.verbose {
                eprintln!("Output: {:?}", output);
                eprintln!("  Literals: {}", stats.literal_count);
                eprintln!(
                    "  Matches: {} ({} bytes, {} repeat distance)",
                    stats.match_count, stats.matched_bytes, stats.repeat_distance_count
                );
                eprintln!("  Model rescales: {}", stats.rescales);
                eprintln!("  Peak memory: {}", format_size(stats.arena_peak as u64));
                eprintln!("  Time: {:.2?}", elapsed);
            }
            report(data.len(), encoded.len());
        }
        Command::Decompress {
            input,
            output,
            max_output_size,
        } => {
            if let Some(max) = max_output_size {
                options = options.with_max_output_size(max);
            }
            let output = output.unwrap_or_else(|| decompressed_path(&input));
            let data = fs::read(&input)?;

            let start = Instant::now();
            let decoded = lzcomp::decompress_with(&data, &options)?;
            let elapsed = start.elapsed();
            fs::write(&output, &decoded)?;

            if args.verbose {
                eprintln!("Output: {:?}", output);
                eprintln!("  Time: {:.2?}", elapsed);
            }
            report(decoded.len(), data.len());
        }
    }

    Ok(())
}

/// `file.txt` -> `file.txt.lz`
fn compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

/// `file.txt.lz` -> `file.txt`; anything else gets `.out` appended.
fn decompressed_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == EXTENSION) {
        input.with_extension("")
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".out");
        PathBuf::from(name)
    }
}

fn report(original: usize, compressed: usize) {
    let ratio = if original > 0 {
        (compressed as f64 / original as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "{} -> {} ({:.1}%)",
        format_size(original as u64),
        format_size(compressed as u64),
        ratio
    );
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
