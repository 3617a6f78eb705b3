//! Round-Robin Scheduler.
//!
//! Scans the pid space starting just after the last process dispatched and
//! picks the first ready one, wrapping around. Every ready process, the idle
//! process included, is therefore chosen once before any is chosen twice.
//!
//! # Performance
//!
//! - **Time Complexity:** `schedule()` is O(P) where P is the process table capacity.
//! - **Space Complexity:** O(P).

use super::Scheduler;
use crate::common::Pid;
use crate::kernel::process::ProcessTable;

/// Round-robin scheduler state.
#[derive(Debug)]
pub struct RoundRobin {
    known: Vec<bool>,
    next: usize,
}

impl RoundRobin {
    /// Creates a scheduler for pids below `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            known: vec![false; capacity],
            next: 0,
        }
    }

    /// Returns the pid the next search starts from.
    pub const fn cursor(&self) -> usize {
        self.next
    }

    /// Moves the search start to `pid`.
    pub fn set_cursor(&mut self, pid: Pid) {
        self.next = pid % self.known.len().max(1);
    }
}

impl Scheduler for RoundRobin {
    fn add_process(&mut self, pid: Pid) {
        if let Some(slot) = self.known.get_mut(pid) {
            *slot = true;
        }
    }

    fn remove_process(&mut self, pid: Pid) {
        if let Some(slot) = self.known.get_mut(pid) {
            *slot = false;
        }
    }

    fn schedule(&mut self, processes: &ProcessTable) -> Option<Pid> {
        let n = self.known.len();
        let ready = |pid: Pid| self.known[pid] && processes.get(pid).is_some_and(|p| p.is_ready());

        let first = self.next;
        let pid = (0..n).map(|i| (first + i) % n).find(|&pid| ready(pid))?;
        self.next = (pid + 1) % n;
        Some(pid)
    }
}
