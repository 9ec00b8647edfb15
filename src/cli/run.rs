// RUN SUBCOMMAND -- THE SCALE TEST DRIVER LOOP

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;

use scale_driver::config::{
    DriverConfig, SpecFiles, DEFAULT_GRACE_SECS, DEFAULT_LOG_FILE, DEFAULT_OUT_FILE,
    DEFAULT_SETTLE_SECS, DEFAULT_SPEC_DIR, SCALE_NAMESPACE,
};
use scale_driver::driver::{Driver, RunOutcome};
use scale_driver::supervise::CancelToken;

use super::check::preflight;

#[derive(Args)]
pub struct RunArgs {
    // INITIAL WORKLOAD SIZE (CONTAINERS)
    #[arg(long, default_value_t = 100)]
    start: u64,

    // MULTIPLIER (EXPONENTIAL) OR INCREMENT (LINEAR)
    #[arg(long, visible_alias = "modifier", default_value_t = 1.5)]
    factor: f64,

    // exponential | linear
    #[arg(long, default_value = "exponential")]
    growth: String,

    // ALSO RUN THE FULL-MESH VARIANT AT EVERY SIZE
    #[arg(long)]
    fullmesh: bool,

    // CONTAINER IMAGE FOR THE SWARM VARIANT (VARIANT SKIPPED WITHOUT IT)
    #[arg(long)]
    image: Option<String>,

    // DIRECTORY HOLDING THE STITCH SPEC TEMPLATES
    #[arg(long, default_value = DEFAULT_SPEC_DIR)]
    spec_dir: PathBuf,

    // SCALE OUTPUT CSV BASE PATH (MODE SUFFIX APPENDED)
    #[arg(long, default_value = DEFAULT_OUT_FILE)]
    out_file: PathBuf,

    // SCALE LOG BASE PATH (MODE SUFFIX APPENDED)
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    // SCALE TESTER COMMAND (WHITESPACE-SEPARATED)
    #[arg(long, default_value = "scale")]
    scale_cmd: String,

    // SWARM TESTER COMMAND (WHITESPACE-SEPARATED)
    #[arg(long, default_value = "swarm")]
    swarm_cmd: String,

    // CLUSTER RESET COMMAND. DEFAULT: quilt stop <namespace>
    #[arg(long)]
    reset_cmd: Option<String>,

    // NAMESPACE THE DEFAULT RESET COMMAND STOPS
    #[arg(long, default_value = SCALE_NAMESPACE)]
    namespace: String,

    // SECONDS TO LET THE CLUSTER SETTLE AFTER A RESET
    #[arg(long, default_value_t = DEFAULT_SETTLE_SECS)]
    settle_secs: u64,

    // SECONDS THE IN-FLIGHT PROCESS GETS TO SHUT DOWN ON CTRL+C
    #[arg(long, default_value_t = DEFAULT_GRACE_SECS)]
    grace_secs: u64,

    // first-launch | every-launch: WHICH LAUNCHES OF A ROUND GET -ip-only
    #[arg(long, default_value = "first-launch")]
    extra_args: String,

    // DUMP FULL ROUND LOG ON EXIT
    #[arg(long)]
    dump_log: bool,
}

fn split_cmd(cmd: &str) -> Vec<String> {
    cmd.split_whitespace().map(str::to_string).collect()
}

impl RunArgs {
    pub fn into_config(self) -> Result<DriverConfig> {
        let reset_cmd = match &self.reset_cmd {
            Some(cmd) => split_cmd(cmd),
            None => vec!["quilt".to_string(), "stop".to_string(), self.namespace.clone()],
        };
        Ok(DriverConfig {
            start: self.start,
            factor: self.factor,
            growth: self.growth.parse()?,
            full_mesh: self.fullmesh,
            image: self.image,
            specs: SpecFiles::in_dir(&self.spec_dir),
            out_file: self.out_file,
            log_file: self.log_file,
            scale_cmd: split_cmd(&self.scale_cmd),
            swarm_cmd: split_cmd(&self.swarm_cmd),
            reset_cmd,
            settle: Duration::from_secs(self.settle_secs),
            grace: Duration::from_secs(self.grace_secs),
            extra_arg_policy: self.extra_args.parse()?,
        })
    }
}

pub fn run_driver(args: RunArgs) -> Result<()> {
    let dump_log = args.dump_log;
    let config = args.into_config()?;
    config.validate()?;

    println!("SCALE DRIVER");
    println!("GROWTH:          {} (start={}, factor={})", config.growth, config.start, config.factor);
    println!("FULL MESH:       {}", config.full_mesh);
    println!("SWARM IMAGE:     {}", config.image.as_deref().unwrap_or("(disabled)"));
    println!("EXTRA ARGS:      {}", config.extra_arg_policy);
    println!("RESET:           {}", config.reset_cmd.join(" "));
    println!("SETTLE / GRACE:  {}s / {}s", config.settle.as_secs(), config.grace.as_secs());
    println!();

    if !preflight(&config) {
        bail!("PREFLIGHT FAILED -- NOTHING LAUNCHED");
    }

    let cancel = CancelToken::new();
    let handler = cancel.clone();
    ctrlc::set_handler(move || {
        handler.cancel();
    })?;

    println!("SCALE DRIVER IS ACTIVE (CTRL+C TO EXIT)");

    let mut driver = Driver::new(&config, cancel);
    let outcome = driver.run_sequence()?;

    println!("SCALE DRIVER IS SHUTTING DOWN");
    if dump_log {
        driver.log.dump();
    }
    driver.log.summary();

    if outcome == RunOutcome::Exhausted {
        println!("WORKLOAD SEQUENCE EXHAUSTED");
    }
    println!("SCALE DRIVER OUT.");
    Ok(())
}
