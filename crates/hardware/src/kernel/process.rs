//! Process control blocks and the process table.

use crate::common::{Cause, Pid, RegisterFile};
use crate::core::units::mmu::page::PageTable;

/// Scheduling state of a live process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessState {
    /// Runnable, waiting to be dispatched.
    Ready,
    /// Currently dispatched on the CPU.
    Running,
    /// Blocked on a sleep countdown or a child's exit.
    Waiting,
}

/// How a process ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// The process called exit with this status.
    Exited(i32),
    /// The process raised a fatal exception.
    Faulted(Cause),
}

impl ExitStatus {
    /// Returns the status code reported to a joining parent.
    pub const fn code(self) -> i32 {
        match self {
            Self::Exited(status) => status,
            Self::Faulted(_) => -1,
        }
    }

    /// Returns `true` for a normal exit.
    pub const fn is_normal(self) -> bool {
        matches!(self, Self::Exited(_))
    }
}

/// A status write owed to a process, performed the next time it is dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingStatus {
    /// User address receiving the status word.
    pub addr: u32,
    /// Status word.
    pub status: i32,
}

/// Process control block.
#[derive(Debug)]
pub struct ProcessContext {
    /// Process id; also the slot index.
    pub pid: Pid,
    /// Program name; names the swap file.
    pub name: String,
    /// Parent process, if still alive.
    pub parent: Option<Pid>,
    /// Scheduling state.
    pub state: ProcessState,
    /// Saved registers. Stale while running.
    pub regs: RegisterFile,
    /// Page table. Empty while running, when the MMU holds it.
    pub table: PageTable,
    /// Timer ticks since the last dispatch.
    pub ticks: u32,
    /// Timer ticks left before a sleeping process becomes ready.
    pub wait_ticks: u32,
    /// Child whose exit this process is waiting for.
    pub joining: Option<Pid>,
    /// Where to store the joined child's status.
    pub status_addr: u32,
    /// Status write to perform on next dispatch.
    pub pending_status: Option<PendingStatus>,
    /// Children that exited before being joined.
    pub exited_children: Vec<(Pid, ExitStatus)>,
}

impl ProcessContext {
    /// Creates a ready process with zeroed registers.
    pub fn new(pid: Pid, name: impl Into<String>, parent: Option<Pid>, table: PageTable) -> Self {
        Self {
            pid,
            name: name.into(),
            parent,
            state: ProcessState::Ready,
            regs: RegisterFile::new(),
            table,
            ticks: 0,
            wait_ticks: 0,
            joining: None,
            status_addr: 0,
            pending_status: None,
            exited_children: Vec::new(),
        }
    }

    /// Returns `true` if the scheduler may dispatch the process.
    pub fn is_ready(&self) -> bool {
        self.state == ProcessState::Ready
    }
}

/// Fixed-capacity arena of process slots indexed by pid.
#[derive(Debug)]
pub struct ProcessTable {
    slots: Vec<Option<ProcessContext>>,
}

impl ProcessTable {
    /// Creates a table with `capacity` empty slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
        }
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of live processes.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Returns `true` if no process is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the lowest free pid, if any slot is free.
    pub fn next_pid(&self) -> Option<Pid> {
        self.slots.iter().position(Option::is_none)
    }

    /// Stores a process built from the lowest free pid.
    ///
    /// # Returns
    ///
    /// The new pid, or `None` if the table is full.
    pub fn insert_with(&mut self, build: impl FnOnce(Pid) -> ProcessContext) -> Option<Pid> {
        let pid = self.next_pid()?;
        self.slots[pid] = Some(build(pid));
        Some(pid)
    }

    /// Removes and returns a process.
    pub fn remove(&mut self, pid: Pid) -> Option<ProcessContext> {
        self.slots.get_mut(pid).and_then(Option::take)
    }

    /// Returns a process.
    pub fn get(&self, pid: Pid) -> Option<&ProcessContext> {
        self.slots.get(pid).and_then(Option::as_ref)
    }

    /// Returns a process mutably.
    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut ProcessContext> {
        self.slots.get_mut(pid).and_then(Option::as_mut)
    }

    /// Returns `true` if `pid` names a live process.
    pub fn contains(&self, pid: Pid) -> bool {
        self.get(pid).is_some()
    }

    /// Iterates over live processes in pid order.
    pub fn iter(&self) -> impl Iterator<Item = &ProcessContext> {
        self.slots.iter().flatten()
    }

    /// Iterates mutably over live processes in pid order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ProcessContext> {
        self.slots.iter_mut().flatten()
    }
}
