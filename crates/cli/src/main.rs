//! TMS320C64x bundle packer CLI.
//!
//! This binary reads post-register-allocation instruction streams as JSON, packs each
//! function into execute packets with the resource-hazard model, and prints the result
//! as parallel-marked assembly. It performs:
//! 1. **Configuration:** Optional JSON config, overridden by command-line flags.
//! 2. **Packing:** One in-order pass per function through the hazard recognizer.
//! 3. **Reporting:** Assembly on stdout; optional statistics and hazard traces on stderr.

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use c64x_sched_core::asm::AsmPrinter;
use c64x_sched_core::config::Config;
use c64x_sched_core::sched::{BundlePacker, Schedule};
use c64x_sched_core::MachineInst;

#[derive(Parser, Debug)]
#[command(
    name = "c64x-sched",
    author,
    version,
    about = "TMS320C64x VLIW bundle packer",
    long_about = "Pack allocated C64x instruction streams into execute packets and print them as assembly.\n\nExamples:\n  c64x-sched schedule kernel.json\n  c64x-sched schedule kernel.json --config sched.json --stats\n  RUST_LOG=c64x_sched_core=trace c64x-sched schedule kernel.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack every function of a JSON program and print the bundles.
    Schedule {
        /// Program to schedule (`{"functions": [{"name": .., "insts": [..]}]}`).
        input: PathBuf,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Log every hazard decision to stderr.
        #[arg(long)]
        trace: bool,

        /// Print scheduling statistics to stderr.
        #[arg(long)]
        stats: bool,

        /// Print one instruction per line without `||` markers.
        #[arg(long)]
        no_bundles: bool,
    },
}

/// A scheduling region as supplied on input.
#[derive(Debug, Deserialize)]
struct Function {
    name: String,
    #[serde(default)]
    insts: Vec<MachineInst>,
}

/// Input file root.
#[derive(Debug, Deserialize)]
struct Program {
    functions: Vec<Function>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Schedule {
            input,
            config,
            trace,
            stats,
            no_bundles,
        } => cmd_schedule(&input, config.as_deref(), trace, stats, no_bundles),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Loads the configuration, packs every function, and prints the assembly.
fn cmd_schedule(
    input: &Path,
    config_path: Option<&Path>,
    trace: bool,
    stats: bool,
    no_bundles: bool,
) -> Result<(), Box<dyn Error>> {
    let mut config = match config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if no_bundles {
        config.printer.bundle_mode = false;
    }
    init_logging(trace || config.general.trace_hazards);

    let text = fs::read_to_string(input)
        .map_err(|e| format!("failed to read {}: {e}", input.display()))?;
    let program: Program = serde_json::from_str(&text)
        .map_err(|e| format!("malformed program {}: {e}", input.display()))?;

    let mut packer = BundlePacker::new(&config.sched);
    let printer = AsmPrinter::new(&config.printer);
    let mut out = io::stdout().lock();

    for function in program.functions {
        let mut schedule = Schedule::new();
        let cycles = packer
            .pack(function.insts, &mut schedule)
            .map_err(|e| format!("{}: {e}", function.name))?;
        tracing::info!(function = %function.name, cycles, "scheduled");

        writeln!(out)?;
        write!(out, "{}", printer.print_function(&function.name, &schedule)?)?;
    }
    out.flush()?;

    if stats {
        eprintln!("{}", packer.stats());
    }
    Ok(())
}

/// Installs a stderr subscriber; `RUST_LOG` takes precedence over `verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
