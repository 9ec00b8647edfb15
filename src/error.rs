// SCALE DRIVER ERRORS
// DOMAIN FAILURES THAT ABORT A COMMAND. ROUND FAILURES ARE NOT ERRORS:
// THE DRIVER RECOVERS AND RETRIES THOSE.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("unknown growth mode '{0}', expected 'exponential' or 'linear'")]
    UnknownGrowthMode(String),

    #[error("unknown extra-arg policy '{0}', expected 'first-launch' or 'every-launch'")]
    UnknownRetryPolicy(String),

    #[error("invalid start {0}: workload size must be >= 1")]
    InvalidStart(u64),

    #[error("invalid growth factor {factor} for {mode} growth: {reason}")]
    InvalidFactor {
        mode: &'static str,
        factor: f64,
        reason: &'static str,
    },

    #[error("empty {0} command")]
    EmptyCommand(&'static str),

    #[error("template {path}: {reason}")]
    Template { path: PathBuf, reason: String },

    #[error("malformed duration '{0}'")]
    Duration(String),

    #[error("{path}:{line}: {reason}")]
    CsvRow {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}
