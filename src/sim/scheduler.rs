//! Periodic clocks driving the simulation
//!
//! The host reports elapsed time with [`Scheduler::advance`] and then drains
//! due firings with [`Scheduler::pop_due`], which yields them in increasing
//! time order (ties go to the clock declared first). All clocks are
//! suspended and resumed together; time that passes while suspended is
//! dropped rather than replayed.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_CATCH_UP_TICKS;

/// Which simulation step a clock drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClockKind {
    /// Player / snake step
    Movement,
    Enemy,
    /// Projectile advance and hit checks
    Projectile,
    /// Releases queued enemies
    Spawn,
}

/// One periodic clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    pub kind: ClockKind,
    pub interval_ms: u32,
    /// Absolute time of the next firing
    next_due_ms: u64,
}

/// Owns every clock of one game instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler {
    clocks: Vec<Clock>,
    now_ms: u64,
    suspended: bool,
}

impl Scheduler {
    pub fn new(clocks: &[(ClockKind, u32)]) -> Self {
        let clocks = clocks
            .iter()
            .map(|&(kind, interval_ms)| Clock {
                kind,
                interval_ms: interval_ms.max(1),
                next_due_ms: u64::from(interval_ms.max(1)),
            })
            .collect();
        Self {
            clocks,
            now_ms: 0,
            suspended: false,
        }
    }

    pub fn clocks(&self) -> &[Clock] {
        &self.clocks
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Resume all clocks; each restarts a full interval from now
    pub fn resume(&mut self) {
        if !self.suspended {
            return;
        }
        self.suspended = false;
        self.rebase();
    }

    /// Move time forward.
    ///
    /// A clock that fell more than `MAX_CATCH_UP_TICKS` intervals behind
    /// (e.g. a long host stall) keeps only its most recent firings.
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.now_ms += elapsed_ms;
        if self.suspended {
            return;
        }
        let now = self.now_ms;
        let cap = u64::from(MAX_CATCH_UP_TICKS);
        for clock in &mut self.clocks {
            if clock.next_due_ms > now {
                continue;
            }
            let interval = u64::from(clock.interval_ms);
            let due = (now - clock.next_due_ms) / interval + 1;
            if due > cap {
                log::warn!(
                    "{:?} clock {} firings behind at {} ms, dropping {}",
                    clock.kind,
                    due,
                    now,
                    due - cap
                );
                clock.next_due_ms += (due - cap) * interval;
            }
        }
    }

    /// Next clock due at or before now, earliest first
    pub fn pop_due(&mut self) -> Option<ClockKind> {
        if self.suspended {
            return None;
        }
        let now = self.now_ms;
        let clock = self
            .clocks
            .iter_mut()
            .filter(|c| c.next_due_ms <= now)
            // min_by_key keeps the first of equal keys: declaration order
            .min_by_key(|c| c.next_due_ms)?;
        clock.next_due_ms += u64::from(clock.interval_ms);
        Some(clock.kind)
    }

    fn rebase(&mut self) {
        for clock in &mut self.clocks {
            clock.next_due_ms = self.now_ms + u64::from(clock.interval_ms);
        }
    }
}
