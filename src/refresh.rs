//! Refresh scheduling
//!
//! All triggers funnel into one debounce point. A burst of triggers
//! collapses into a single pass; a trigger that lands while a pass is
//! running queues exactly one more pass after it.

use std::fmt;
use std::time::{Duration, Instant};

/// Identifier of the user-invocable refresh action
pub const REFRESH_COMMAND: &str = "linestat.refresh";

/// What asked for a recomputation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    FileCreated,
    FileModified,
    FileDeleted,
    /// Index, HEAD or refs changed under `.git`
    GitStateChanged,
    ManualRefresh,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trigger::FileCreated => "file-created",
            Trigger::FileModified => "file-modified",
            Trigger::FileDeleted => "file-deleted",
            Trigger::GitStateChanged => "git-state-changed",
            Trigger::ManualRefresh => REFRESH_COMMAND,
        };
        f.write_str(name)
    }
}

/// Where the refresh cycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A pass will start at the deadline unless another trigger pushes it back
    Scheduled { deadline: Instant },
    /// A pass is in flight; `pending` records a trigger seen meanwhile
    Running { pending: bool },
}

/// Single-slot debounce with queue-one-after-running
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    phase: Phase,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Register a trigger at `now`
    pub fn trigger(&mut self, now: Instant) {
        self.phase = match self.phase {
            Phase::Idle | Phase::Scheduled { .. } => Phase::Scheduled {
                deadline: now + self.delay,
            },
            Phase::Running { .. } => Phase::Running { pending: true },
        };
    }

    /// When the scheduled pass is due, if one is scheduled
    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Scheduled { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Move to `Running` if the scheduled pass is due; returns whether it did
    pub fn start_if_due(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Scheduled { deadline } if deadline <= now => {
                self.phase = Phase::Running { pending: false };
                true
            }
            _ => false,
        }
    }

    /// Start a pass right away, bypassing the delay (used at startup)
    pub fn start_now(&mut self) {
        self.phase = Phase::Running { pending: false };
    }

    /// Mark the in-flight pass complete
    pub fn finish(&mut self, now: Instant) {
        self.phase = match self.phase {
            Phase::Running { pending: true } => Phase::Scheduled {
                deadline: now + self.delay,
            },
            _ => Phase::Idle,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_burst_collapses_and_resets_timer() {
        let t0 = Instant::now();
        let mut debounce = Debounce::new(DELAY);

        debounce.trigger(t0);
        debounce.trigger(t0 + ms(200));
        debounce.trigger(t0 + ms(400));

        assert_eq!(debounce.deadline(), Some(t0 + ms(900)));
        assert!(!debounce.start_if_due(t0 + ms(600)));
        assert!(debounce.start_if_due(t0 + ms(900)));
        assert_eq!(debounce.phase(), Phase::Running { pending: false });
        assert!(!debounce.start_if_due(t0 + ms(901)));
    }

    #[test]
    fn test_idle_after_finish() {
        let t0 = Instant::now();
        let mut debounce = Debounce::new(DELAY);

        debounce.trigger(t0);
        assert!(debounce.start_if_due(t0 + DELAY));
        debounce.finish(t0 + ms(700));

        assert_eq!(debounce.phase(), Phase::Idle);
        assert_eq!(debounce.deadline(), None);
    }

    #[test]
    fn test_trigger_while_running_queues_one() {
        let t0 = Instant::now();
        let mut debounce = Debounce::new(DELAY);

        debounce.start_now();
        debounce.trigger(t0 + ms(10));
        debounce.trigger(t0 + ms(20));
        assert_eq!(debounce.phase(), Phase::Running { pending: true });
        assert_eq!(debounce.deadline(), None);

        debounce.finish(t0 + ms(100));
        assert_eq!(debounce.deadline(), Some(t0 + ms(600)));

        assert!(debounce.start_if_due(t0 + ms(600)));
        debounce.finish(t0 + ms(650));
        assert_eq!(debounce.phase(), Phase::Idle);
    }

    #[test]
    fn test_manual_refresh_name() {
        assert_eq!(Trigger::ManualRefresh.to_string(), REFRESH_COMMAND);
    }
}
