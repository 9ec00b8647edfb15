// PLOT SUBCOMMAND -- RENDER SCALE TEST CSV OUTPUT

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use scale_driver::plot::{run_plot, PlotConfig};

#[derive(Args)]
pub struct PlotArgs {
    // DISCONNECTED RUN CSV (OPTIONAL SERIES)
    #[arg(long)]
    disconnect: Option<PathBuf>,

    // FULL-MESH RUN CSV
    #[arg(long)]
    connect: PathBuf,

    // SWARM RUN CSV (OPTIONAL SERIES)
    #[arg(long)]
    swarm: Option<PathBuf>,

    // WHERE THE SVG GOES. PARENT DIRS ARE CREATED.
    #[arg(long)]
    outfile: PathBuf,

    // X TICK SPACING IN THOUSANDS OF CONTAINERS
    #[arg(long, default_value_t = 1)]
    xtick: u32,

    // Y TICK SPACING IN MINUTES
    #[arg(long, default_value_t = 5)]
    ytick: u32,
}

pub fn run(args: PlotArgs) -> Result<()> {
    let config = PlotConfig {
        disconnect: args.disconnect,
        connect: args.connect,
        swarm: args.swarm,
        outfile: args.outfile,
        xtick: args.xtick,
        ytick: args.ytick,
    };
    run_plot(&config)?;
    println!("PLOT WRITTEN TO {}", config.outfile.display());
    Ok(())
}
