//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters of a simulation run. It provides:
//! 1. **Execution:** Retired instructions and derived throughput.
//! 2. **Exceptions:** Counts by kind (syscalls, page faults, interrupts, fatal).
//! 3. **Paging:** Evictions, page saves to swap, and page loads from swap.
//! 4. **Scheduling:** Context switches, timer ticks, and process lifecycle.

use std::time::Instant;

use serde::Serialize;

use crate::common::{Cause, Exception};

/// Simulation statistics structure tracking all counters.
#[derive(Clone, Debug, Serialize)]
pub struct SimStats {
    #[serde(skip)]
    start_time: Instant,
    /// Number of instructions that completed writeback.
    pub instructions_retired: u64,

    /// Syscall exceptions taken.
    pub syscalls: u64,
    /// Page fault exceptions taken.
    pub page_faults: u64,
    /// Interrupts taken.
    pub interrupts: u64,
    /// Exceptions that terminated the raising process.
    pub fatal_exceptions: u64,

    /// Resident pages evicted to make room for another page.
    pub page_evictions: u64,
    /// Page contents written to swap.
    pub page_saves: u64,
    /// Page contents read back from swap.
    pub page_loads: u64,
    /// Never-saved pages made resident as zero-filled frames.
    pub zero_fills: u64,

    /// Dispatches of a process other than the one previously running.
    pub context_switches: u64,
    /// Timer interrupts serviced.
    pub timer_ticks: u64,
    /// User processes created. The idle process is not counted.
    pub processes_spawned: u64,
    /// Processes terminated, normally or not.
    pub processes_exited: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            instructions_retired: 0,
            syscalls: 0,
            page_faults: 0,
            interrupts: 0,
            fatal_exceptions: 0,
            page_evictions: 0,
            page_saves: 0,
            page_loads: 0,
            zero_fills: 0,
            context_switches: 0,
            timer_ticks: 0,
            processes_spawned: 0,
            processes_exited: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "exceptions", "paging", "scheduling"];

impl SimStats {
    /// Counts one exception by kind.
    pub fn record_exception(&mut self, exception: &Exception) {
        match exception.cause() {
            Cause::Syscall => self.syscalls += 1,
            Cause::PageFault => self.page_faults += 1,
            Cause::Interrupt => self.interrupts += 1,
            _ => self.fatal_exceptions += 1,
        }
    }

    /// Returns the statistics as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to print all sections (same as `print()`).
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();

        println!("==========================================================");
        if want("summary") {
            let mips = if seconds > 0.0 {
                self.instructions_retired as f64 / seconds / 1_000_000.0
            } else {
                0.0
            };
            println!("SUMMARY");
            println!("  host_seconds         {seconds:>12.4}");
            println!("  instructions         {:>12}", self.instructions_retired);
            println!("  sim_mips             {mips:>12.2}");
        }
        if want("exceptions") {
            println!("EXCEPTIONS");
            println!("  syscalls             {:>12}", self.syscalls);
            println!("  page_faults          {:>12}", self.page_faults);
            println!("  interrupts           {:>12}", self.interrupts);
            println!("  fatal                {:>12}", self.fatal_exceptions);
        }
        if want("paging") {
            println!("PAGING");
            println!("  evictions            {:>12}", self.page_evictions);
            println!("  saves                {:>12}", self.page_saves);
            println!("  loads                {:>12}", self.page_loads);
            println!("  zero_fills           {:>12}", self.zero_fills);
        }
        if want("scheduling") {
            println!("SCHEDULING");
            println!("  context_switches     {:>12}", self.context_switches);
            println!("  timer_ticks          {:>12}", self.timer_ticks);
            println!("  processes_spawned    {:>12}", self.processes_spawned);
            println!("  processes_exited     {:>12}", self.processes_exited);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
