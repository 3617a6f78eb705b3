//! Process Schedulers.
//!
//! Selects the next process to dispatch. Schedulers only choose; the kernel
//! performs the context switch and maintains process states.
//!
//! # Schedulers
//!
//! - `RoundRobin`: Rotates through all known processes.

/// Round-robin scheduler.
pub mod round_robin;

pub use round_robin::RoundRobin;

use crate::common::Pid;
use crate::config::{KernelConfig, SchedulerKind};

use super::process::ProcessTable;

/// Trait for process schedulers.
pub trait Scheduler: Send + std::fmt::Debug {
    /// Registers a new process.
    fn add_process(&mut self, pid: Pid);

    /// Forgets an exited process.
    fn remove_process(&mut self, pid: Pid);

    /// Chooses the next process to run.
    ///
    /// # Arguments
    ///
    /// * `processes` - The process table; only `Ready` processes are eligible.
    ///
    /// # Returns
    ///
    /// The chosen pid, or `None` if no known process is ready.
    fn schedule(&mut self, processes: &ProcessTable) -> Option<Pid>;
}

/// Builds the scheduler selected by `config`.
pub fn build(config: &KernelConfig) -> Box<dyn Scheduler> {
    match config.scheduler {
        SchedulerKind::RoundRobin => Box::new(RoundRobin::new(config.max_processes)),
    }
}
