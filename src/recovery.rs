// CLUSTER RESET AFTER A FAILED ROUND
// BEST EFFORT: A RESET THAT FAILS OR CANNOT START IS LOGGED AND THE SETTLE
// DELAY STILL APPLIES BEFORE THE ROUND IS RELAUNCHED.

use std::process::Command;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::DriverConfig;
use crate::supervise::{shutdown, CancelToken, ProcGuard, WaitOutcome};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RecoveryOutcome {
    Recovered,
    Interrupted,
}

pub struct RecoveryAction<'a> {
    command: &'a [String],
    settle:  Duration,
    grace:   Duration,
}

impl<'a> RecoveryAction<'a> {
    pub fn from_config(config: &'a DriverConfig) -> Self {
        Self {
            command: &config.reset_cmd,
            settle: config.settle,
            grace: config.grace,
        }
    }

    fn spawn(&self) -> Option<ProcGuard> {
        let (program, args) = self.command.split_first()?;
        match ProcGuard::spawn(Command::new(program).args(args)) {
            Ok(guard) => Some(guard),
            Err(e) => {
                warn!(error = %format!("{:#}", e), "reset command did not start");
                None
            }
        }
    }

    // SPAWN RESET, WAIT FOR IT, SETTLE, THEN REAP THE HELPER
    pub fn run(&self, cancel: &CancelToken) -> RecoveryOutcome {
        info!(command = ?self.command, settle_secs = self.settle.as_secs_f64(), "resetting cluster");
        let mut helper = self.spawn();

        if let Some(guard) = helper.as_mut() {
            match guard.wait(cancel) {
                Ok(WaitOutcome::Exited(status)) if !status.success() => {
                    warn!(%status, "reset command failed");
                }
                Ok(WaitOutcome::Exited(_)) => {}
                Ok(WaitOutcome::Cancelled) => {
                    if let Some(guard) = helper.take() {
                        shutdown(guard, self.grace);
                    }
                    return RecoveryOutcome::Interrupted;
                }
                Err(e) => warn!(error = %format!("{:#}", e), "lost track of reset command"),
            }
        }

        if !cancel.sleep(self.settle) {
            if let Some(mut guard) = helper.take() {
                if guard.is_running() {
                    shutdown(guard, self.grace);
                }
            }
            return RecoveryOutcome::Interrupted;
        }

        if let Some(mut guard) = helper.take() {
            guard.stop();
        }
        RecoveryOutcome::Recovered
    }
}
