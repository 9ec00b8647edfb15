// SCALE DRIVER -- CLUSTER SCALE TEST ORCHESTRATION
// LAUNCHES THE EXTERNAL SCALE TESTER AT GROWING CONTAINER COUNTS,
// RESETS THE CLUSTER AND RETRIES WHEN A ROUND FAILS, AND PLOTS RESULTS.
//
// THE TESTED SYSTEM IS OPAQUE: EXIT CODE 0 IS THE ONLY SIGNAL USED.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scale-driver")]
#[command(about = "SCALE DRIVER -- GROWING-WORKLOAD CLUSTER SCALE TESTS")]
struct Cli {
    // PRINT DEBUG-LEVEL DIAGNOSTICS
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    // RUN THE SCALE TEST SEQUENCE UNTIL CTRL+C
    Run(cli::run::RunArgs),
    // RENDER SCALE TEST CSV OUTPUT
    Plot(cli::plot::PlotArgs),
    // VERIFY TOOLS AND TEMPLATES WITHOUT LAUNCHING ANYTHING
    Check(cli::run::RunArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    scale_driver::logging::init(cli.verbose)?;

    match cli.command {
        Command::Run(args) => cli::run::run_driver(args),
        Command::Plot(args) => cli::plot::run(args),
        Command::Check(args) => cli::check::run_check(args),
    }
}
