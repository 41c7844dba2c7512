use clap::{Parser, ValueEnum};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use sysinfo::{System, SystemExt};

use popseed::io_utils::{io_cli_error, popseed_cli_error};
use popseed::{search, SearchParams, Variant};

/// Recover structure seeds for a stream of internal generator states.
#[derive(Parser)]
struct Args {
    /// Input file with one decimal internal seed per line
    input: PathBuf,
    /// Output file for recovered structure seeds
    output: PathBuf,
    /// Worker thread count; 0 detects the number of CPUs
    #[clap(long, default_value_t = 1)]
    threads: usize,
    /// Derivation variant to invert
    #[clap(long, value_enum)]
    variant: VariantArg,
    /// Population salt; required by the late variant
    #[clap(long, allow_negative_numbers = true, required_if_eq("variant", "late"))]
    salt: Option<i32>,
    /// Minimum chunk x coordinate (inclusive)
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    min_x: i32,
    /// Maximum chunk x coordinate (inclusive)
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    max_x: i32,
    /// Minimum chunk z coordinate (inclusive)
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    min_z: i32,
    /// Maximum chunk z coordinate (inclusive)
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    max_z: i32,
    /// Minimum call index (inclusive); -1 queries the raw internal seed
    #[clap(long, default_value_t = -1, allow_negative_numbers = true)]
    min_calls: i32,
    /// Maximum call index (inclusive)
    #[clap(long, default_value_t = -1, allow_negative_numbers = true)]
    max_calls: i32,
    /// Show a live seed counter on stderr
    #[clap(long)]
    progress: bool,
    /// Print the run summary as JSON on stdout
    #[clap(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    /// Truncating-division rounding, unscaled chunk coordinates
    Early,
    /// Bitwise force-to-odd, salted, chunk coordinates scaled by 16
    Late,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Variant {
        match arg {
            VariantArg::Early => Variant::Early,
            VariantArg::Late => Variant::Late,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let threads = if args.threads == 0 {
        detected_threads()
    } else {
        args.threads
    };

    let params = SearchParams {
        variant: args.variant.into(),
        salt: args.salt.unwrap_or(0),
        threads,
        min_chunk_x: args.min_x,
        max_chunk_x: args.max_x,
        min_chunk_z: args.min_z,
        max_chunk_z: args.max_z,
        min_calls: args.min_calls,
        max_calls: args.max_calls,
    }
    .validated()
    .map_err(|e| popseed_cli_error("invalid configuration", e))?;

    let variant_name = match params.variant {
        Variant::Early => "early",
        Variant::Late => "late",
    };
    eprintln!("Using the following parameters:");
    eprintln!("input = {}", args.input.display());
    eprintln!("output = {}", args.output.display());
    eprintln!("threads = {}", params.threads);
    eprintln!("variant = {variant_name}");
    eprintln!("salt = {}", params.salt);
    eprintln!("chunk_x = {}..={}", params.min_chunk_x, params.max_chunk_x);
    eprintln!("chunk_z = {}..={}", params.min_chunk_z, params.max_chunk_z);
    eprintln!("calls = {}..={}", params.min_calls, params.max_calls);

    let input = File::open(&args.input)
        .map_err(|e| io_cli_error("opening input file", &args.input, e))?;
    let output = File::create(&args.output)
        .map_err(|e| io_cli_error("creating output file", &args.output, e))?;

    let bar = args.progress.then(ProgressBar::new_spinner);
    let stats = search::run(
        &params,
        BufReader::new(input),
        BufWriter::new(output),
        bar.clone(),
    )
    .map_err(|e| popseed_cli_error("search failed", e))?;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        stats.print();
    }
    Ok(())
}

fn detected_threads() -> usize {
    let mut sys = System::new();
    sys.refresh_cpu();
    sys.cpus().len().max(1)
}
