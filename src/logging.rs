// DIAGNOSTIC LOGGING
// OPERATOR BANNERS AND SUMMARIES GO TO STDOUT VIA println!. STRUCTURED
// EVENTS (LAUNCHES, FAILURES, RESETS) GO TO STDERR THROUGH tracing.
// RUST_LOG OVERRIDES THE LEVEL PICKED HERE.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("scale_driver={}", level)))
        .map_err(|e| anyhow!("bad log filter: {}", e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize tracing subscriber: {}", e))
}
