// SPDX-License-Identifier: GPL-3.0-only

//! Recurring scan task
//!
//! The live-feed sampling loop is modelled as an explicit task rather than a
//! self-rescheduling callback: each tick the owner asks whether the task is
//! due, samples once, and either reschedules it or drops it. Cancelling the
//! task makes every later poll a no-op, so a tick that races a stop exits
//! without sampling.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
pub struct ScanTask {
    id: u64,
    cancelled: AtomicBool,
    interval: Duration,
    next_due: Instant,
    ticks: u64,
}

impl ScanTask {
    /// Create a task that is due immediately
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            id: NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed),
            cancelled: AtomicBool::new(false),
            interval,
            next_due: now,
            ticks: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of times the task has been rescheduled
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Whether the task should sample on this tick
    pub fn is_due(&self, now: Instant) -> bool {
        !self.is_cancelled() && now >= self.next_due
    }

    /// Schedule the next sample one interval from `now`
    ///
    /// Returns false if the task was cancelled in the meantime.
    pub fn reschedule(&mut self, now: Instant) -> bool {
        if self.is_cancelled() {
            return false;
        }
        self.next_due = now + self.interval;
        self.ticks += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_immediately_then_after_interval() {
        let now = Instant::now();
        let mut task = ScanTask::new(Duration::from_millis(16), now);
        assert!(task.is_due(now));

        assert!(task.reschedule(now));
        assert!(!task.is_due(now));
        assert!(task.is_due(now + Duration::from_millis(16)));
        assert_eq!(task.ticks(), 1);
    }

    #[test]
    fn test_cancelled_task_never_due() {
        let now = Instant::now();
        let mut task = ScanTask::new(Duration::ZERO, now);
        task.cancel();

        assert!(task.is_cancelled());
        assert!(!task.is_due(now));
        assert!(!task.reschedule(now));
        assert_eq!(task.ticks(), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let now = Instant::now();
        let a = ScanTask::new(Duration::ZERO, now);
        let b = ScanTask::new(Duration::ZERO, now);
        assert_ne!(a.id(), b.id());
    }
}
