//! Phasor - DC / AC phasor circuit solver
//!
//! Solves a resistor / voltage-source netlist and prints node voltages,
//! source currents and resistor currents.
//!
//! # Usage
//!
//! ```bash
//! phasor circuit.txt
//! phasor circuit.txt --mode ac
//! RUST_LOG=debug phasor circuit.txt
//! ```

use std::io;
use std::path::PathBuf;

use clap::Parser;
use phasor_core::{
    dsl,
    error::Result,
    solver::{report, AnalysisMode, DEFAULT_CONDITION_LIMIT, DEFAULT_PIVOT_TOLERANCE},
    Simulator, SimulatorConfig,
};
use tracing::info;

/// Linear DC / AC phasor circuit solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file
    #[arg(value_name = "NETLIST_FILE")]
    netlist_file: PathBuf,

    /// Arithmetic to solve in: auto, dc or ac
    #[arg(short, long, default_value_t = AnalysisMode::Auto)]
    mode: AnalysisMode,

    /// Relative pivot threshold below which the system is singular
    #[arg(long, default_value_t = DEFAULT_PIVOT_TOLERANCE)]
    pivot_tolerance: f64,

    /// Condition estimate above which a precision warning is printed
    #[arg(long, default_value_t = DEFAULT_CONDITION_LIMIT)]
    condition_limit: f64,
}

fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    // Parse and validate the netlist
    let netlist = dsl::parse_file(&args.netlist_file)?;
    info!(
        file = %args.netlist_file.display(),
        domain = %netlist.domain(),
        "loaded netlist"
    );

    let config = SimulatorConfig::new()
        .with_mode(args.mode)
        .with_pivot_tolerance(args.pivot_tolerance)
        .with_condition_limit(args.condition_limit);
    let solution = Simulator::with_config(config).solve(&netlist)?;

    print!("{}", report::render(&netlist, &solution));

    Ok(())
}
