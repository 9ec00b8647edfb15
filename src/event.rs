// SCALE DRIVER ROUND LOG
// RECORDS EVERY LAUNCH, FAILURE, RECOVERY AND COMPLETION DURING A RUN.
// PRE-ALLOCATED RING BUFFER. WRAPS AROUND AT CAPACITY -- OLDEST ENTRIES
// OVERWRITTEN, TOTALS KEPT SEPARATELY SO SUMMARIES STAY EXACT.

use std::time::Instant;

use crate::round::Mode;

const MAX_EVENTS: usize = 4096;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EventKind {
    Launch,
    Failed,
    Recovered,
    Succeeded,
    Interrupted,
}

impl EventKind {
    const ALL: [EventKind; 5] = [
        Self::Launch,
        Self::Failed,
        Self::Recovered,
        Self::Succeeded,
        Self::Interrupted,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Launch => "LAUNCH",
            Self::Failed => "FAILED",
            Self::Recovered => "RECOVERED",
            Self::Succeeded => "SUCCEEDED",
            Self::Interrupted => "INTERRUPTED",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RoundEvent {
    pub at:      Instant,
    pub kind:    EventKind,
    pub mode:    Mode,
    pub size:    u64,
    pub attempt: u32,
}

pub struct RoundLog {
    events: Vec<Option<RoundEvent>>,
    head:   usize,
    len:    usize,
    totals: [u64; 5],
    start:  Instant,
}

impl Default for RoundLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundLog {
    pub fn new() -> Self {
        Self {
            events: vec![None; MAX_EVENTS],
            head: 0,
            len: 0,
            totals: [0; 5],
            start: Instant::now(),
        }
    }

    pub fn record(&mut self, kind: EventKind, mode: Mode, size: u64, attempt: u32) {
        self.events[self.head] = Some(RoundEvent {
            at: Instant::now(),
            kind,
            mode,
            size,
            attempt,
        });
        self.head = (self.head + 1) % MAX_EVENTS;
        if self.len < MAX_EVENTS {
            self.len += 1;
        }
        self.totals[kind.index()] += 1;
    }

    // TOTAL OVER THE WHOLE RUN, INCLUDING ENTRIES THE RING HAS DROPPED
    pub fn count(&self, kind: EventKind) -> u64 {
        self.totals[kind.index()]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // ITERATE RETAINED EVENTS IN CHRONOLOGICAL ORDER
    pub fn iter(&self) -> impl Iterator<Item = &RoundEvent> {
        let start = if self.len < MAX_EVENTS { 0 } else { self.head };
        (0..self.len).filter_map(move |i| self.events[(start + i) % MAX_EVENTS].as_ref())
    }

    // LARGEST WORKLOAD THAT COMPLETED IN EACH MODE
    pub fn largest_success(&self, mode: Mode) -> Option<u64> {
        self.iter()
            .filter(|e| e.kind == EventKind::Succeeded && e.mode == mode)
            .map(|e| e.size)
            .max()
    }

    pub fn dump(&self) {
        if self.len == 0 {
            return;
        }

        println!("\n{:<10} {:<12} {:<14} {:<10} {:<8}",
            "TIME_S", "EVENT", "MODE", "SIZE", "ATTEMPT");
        println!("{}", "-".repeat(58));

        for e in self.iter() {
            let elapsed_s = e.at.duration_since(self.start).as_secs_f64();
            println!("{:<10.1} {:<12} {:<14} {:<10} {:<8}",
                elapsed_s, e.kind.label(), e.mode.label(), e.size, e.attempt);
        }

        if self.len == MAX_EVENTS {
            println!("\n(RING BUFFER WRAPPED -- SHOWING MOST RECENT {} EVENTS)", MAX_EVENTS);
        }
        println!("TOTAL EVENTS: {}", self.totals.iter().sum::<u64>());
    }

    pub fn summary(&self) {
        println!("\n{}", "=".repeat(50));
        println!("SCALE DRIVER SUMMARY");
        println!("{}", "=".repeat(50));
        for kind in EventKind::ALL {
            println!("  {:<18} {}", format!("{}:", kind.label()), self.count(kind));
        }
        for mode in Mode::ALL {
            if let Some(size) = self.largest_success(mode) {
                println!("  {:<18} {}", format!("MAX {}:", mode.label()), size);
            }
        }
        println!("  {:<18} {:.1}s", "ELAPSED:", self.start.elapsed().as_secs_f64());
    }
}
