// PROCESS SUPERVISION
// ONE EXTERNAL PROCESS IN FLIGHT AT A TIME. EVERY BLOCKING WAIT POLLS A
// CANCEL TOKEN SO AN OPERATOR INTERRUPT PREEMPTS IT WHEREVER IT LANDS.
//
// CHILDREN RUN IN THEIR OWN PROCESS GROUP: A TERMINAL CTRL+C REACHES ONLY
// THE DRIVER, WHICH THEN SIGNALS THE WHOLE GROUP ITSELF.

use std::os::unix::process::CommandExt;
use std::process::{Child, Command, ExitStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Clone, Default, Debug)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    // SLEEP IN POLL-SIZED SLICES. FALSE IF CANCELLED BEFORE THE DEADLINE.
    pub fn sleep(&self, dur: Duration) -> bool {
        let deadline = Instant::now() + dur;
        loop {
            if self.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep(POLL_INTERVAL.min(deadline - now));
        }
    }
}

#[derive(Debug)]
pub enum WaitOutcome {
    Exited(ExitStatus),
    Cancelled,
}

pub struct ProcGuard {
    child: Option<Child>,
    pgid: i32,
}

impl ProcGuard {
    pub fn spawn(cmd: &mut Command) -> Result<Self> {
        let child = cmd
            .process_group(0)
            .spawn()
            .with_context(|| format!("spawning {:?}", cmd.get_program()))?;
        let pgid = child.id() as i32;
        debug!(pid = pgid, program = ?cmd.get_program(), "spawned");
        Ok(Self {
            child: Some(child),
            pgid,
        })
    }

    pub fn id(&self) -> i32 {
        self.pgid
    }

    // BLOCK UNTIL THE CHILD EXITS OR THE TOKEN FIRES
    pub fn wait(&mut self, cancel: &CancelToken) -> Result<WaitOutcome> {
        let child = match self.child.as_mut() {
            Some(c) => c,
            None => anyhow::bail!("process {} already reaped", self.pgid),
        };
        loop {
            if let Some(status) = child.try_wait().context("waiting on child")? {
                self.child = None;
                return Ok(WaitOutcome::Exited(status));
            }
            if cancel.is_cancelled() {
                return Ok(WaitOutcome::Cancelled);
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(c) => matches!(c.try_wait(), Ok(None)),
            None => false,
        }
    }

    // ASK THE GROUP TO SHUT DOWN. NO-OP ONCE REAPED.
    pub fn terminate(&mut self) {
        if self.is_running() {
            unsafe {
                libc::killpg(self.pgid, libc::SIGTERM);
            }
        }
    }

    pub fn kill(&mut self) {
        let mut child = match self.child.take() {
            Some(c) => c,
            None => return,
        };
        if let Ok(Some(_)) = child.try_wait() {
            return;
        }
        unsafe {
            libc::killpg(self.pgid, libc::SIGKILL);
        }
        let _ = child.wait();
    }

    // SIGTERM, SHORT BOUNDED WAIT, THEN SIGKILL
    pub fn stop(&mut self) {
        self.terminate();
        let deadline = Instant::now() + Duration::from_millis(500);
        while self.is_running() && Instant::now() < deadline {
            std::thread::sleep(POLL_INTERVAL);
        }
        self.kill();
    }
}

impl Drop for ProcGuard {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.stop();
        }
    }
}

/// Interrupt path: SIGTERM the group, sit out the full grace period so the
/// process can tear down its cluster state, then SIGKILL whatever is left.
pub fn shutdown(mut guard: ProcGuard, grace: Duration) {
    warn!(pid = guard.id(), grace_secs = grace.as_secs_f64(), "interrupted, terminating in-flight process");
    guard.terminate();
    std::thread::sleep(grace);
    if guard.is_running() {
        warn!(pid = guard.id(), "still running after grace period, killing");
    }
    guard.kill();
}
