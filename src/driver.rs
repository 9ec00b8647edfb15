// SCALE TEST DRIVER
// WARM UP AT ONE CONTAINER, THEN WALK THE WORKLOAD SEQUENCE FOREVER.
// EVERY ROUND IS RETRIED UNTIL IT PASSES; A FAILURE TRIGGERS A CLUSTER
// RESET FIRST. ONLY AN OPERATOR INTERRUPT ENDS THE RUN.

use std::fs;
use std::io::ErrorKind;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::DriverConfig;
use crate::event::{EventKind, RoundLog};
use crate::recovery::{RecoveryAction, RecoveryOutcome};
use crate::round::{command_line, with_suffix, Mode, IP_ONLY_FLAG};
use crate::supervise::{shutdown, CancelToken, ProcGuard, WaitOutcome};
use crate::template;

const WARMUP_SIZE: u64 = 1;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RoundOutcome {
    Completed { launches: u32 },
    Interrupted,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RunOutcome {
    Interrupted,
    // ONLY REACHABLE WITH A FINITE SIZE SOURCE
    Exhausted,
}

pub struct Driver<'a> {
    config:  &'a DriverConfig,
    cancel:  CancelToken,
    pub log: RoundLog,
}

impl<'a> Driver<'a> {
    pub fn new(config: &'a DriverConfig, cancel: CancelToken) -> Self {
        Self {
            config,
            cancel,
            log: RoundLog::new(),
        }
    }

    pub fn run_sequence(&mut self) -> Result<RunOutcome> {
        let sizes = self.config.sequence()?;
        self.run_sizes(sizes)
    }

    pub fn run_sizes<I>(&mut self, sizes: I) -> Result<RunOutcome>
    where
        I: IntoIterator<Item = u64>,
    {
        // BOOT ONE CONTAINER SO THE MACHINES ARE UP BEFORE ANYTHING IS TIMED
        println!("WARM-UP: {} CONTAINER ({})", WARMUP_SIZE, Mode::Disconnected.label());
        self.materialize(WARMUP_SIZE, &[Mode::Disconnected])?;
        if self.run_round(Mode::Disconnected, WARMUP_SIZE, &[])? == RoundOutcome::Interrupted {
            return Ok(RunOutcome::Interrupted);
        }

        self.clear_logs()?;

        let modes = self.config.modes();
        for size in sizes {
            if self.cancel.is_cancelled() {
                return Ok(RunOutcome::Interrupted);
            }
            println!("{}", "-".repeat(40));
            println!("WORKLOAD: {} CONTAINERS", size);
            println!("{}", "-".repeat(40));

            self.materialize(size, &modes)?;
            for &mode in &modes {
                if self.run_round(mode, size, &[IP_ONLY_FLAG])? == RoundOutcome::Interrupted {
                    return Ok(RunOutcome::Interrupted);
                }
            }
        }
        Ok(RunOutcome::Exhausted)
    }

    pub fn run_round(&mut self, mode: Mode, size: u64, extra: &[&str]) -> Result<RoundOutcome> {
        let mut launch: u32 = 0;
        loop {
            launch += 1;
            let args: &[&str] = if self.config.extra_arg_policy.applies(launch) { extra } else { &[] };
            let argv = command_line(self.config, mode, size, args);

            info!(mode = mode.label(), size, launch, "launching round");
            self.log.record(EventKind::Launch, mode, size, launch);

            let failure = match spawn(&argv) {
                Ok(mut guard) => {
                    let waited = guard.wait(&self.cancel);
                    match waited {
                        Ok(WaitOutcome::Exited(status)) if status.success() => {
                            info!(mode = mode.label(), size, launch, "round passed");
                            self.log.record(EventKind::Succeeded, mode, size, launch);
                            return Ok(RoundOutcome::Completed { launches: launch });
                        }
                        Ok(WaitOutcome::Exited(status)) => status.to_string(),
                        Ok(WaitOutcome::Cancelled) => {
                            self.log.record(EventKind::Interrupted, mode, size, launch);
                            shutdown(guard, self.config.grace);
                            return Ok(RoundOutcome::Interrupted);
                        }
                        Err(e) => format!("{:#}", e),
                    }
                }
                Err(e) => format!("{:#}", e),
            };

            self.log.record(EventKind::Failed, mode, size, launch);
            warn!(mode = mode.label(), size, launch, reason = %failure, "round failed, retrying");
            println!("THE SCALE TESTER EXITED WITH AN ERROR ({}). TRYING AGAIN", failure);

            match RecoveryAction::from_config(self.config).run(&self.cancel) {
                RecoveryOutcome::Recovered => {
                    self.log.record(EventKind::Recovered, mode, size, launch);
                }
                RecoveryOutcome::Interrupted => {
                    self.log.record(EventKind::Interrupted, mode, size, launch);
                    return Ok(RoundOutcome::Interrupted);
                }
            }
        }
    }

    // REMOVE DRIVER LOG FILES SO NOTHING FROM THE WARM-UP OR A PREVIOUS
    // RUN ENDS UP IN THIS RUN'S LOGS
    pub fn clear_logs(&self) -> Result<()> {
        let base = &self.config.log_file;
        let mut paths = vec![base.clone()];
        paths.extend(Mode::ALL.iter().map(|m| with_suffix(base, m.suffix())));
        for path in paths {
            match fs::remove_file(&path) {
                Ok(()) => info!(path = %path.display(), "removed stale log"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("removing {}", path.display()));
                }
            }
        }
        Ok(())
    }

    fn materialize(&self, size: u64, modes: &[Mode]) -> Result<()> {
        for path in self.config.templates_for(modes) {
            template::materialize(path, size)?;
        }
        Ok(())
    }
}

fn spawn(argv: &[String]) -> Result<ProcGuard> {
    let (program, args) = argv.split_first().context("empty scale command")?;
    ProcGuard::spawn(Command::new(program).args(args))
}
