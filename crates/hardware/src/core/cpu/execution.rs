//! Main Execution Loop.
//!
//! This module implements the execution cycle of the CPU. It performs the following:
//! 1. **Pipeline Coordination:** Moves one instruction through all four stages.
//! 2. **Exception Reporting:** Records the cause of a failed step before returning it.
//! 3. **Interrupt Handling:** Checks for a pending interrupt after each completed instruction.

use super::Cpu;
use crate::common::Exception;
use crate::core::pipeline::stages::{decode_stage, execute_stage, fetch_stage, wb_stage};

impl Cpu {
    /// Executes exactly one instruction.
    ///
    /// Nothing is retried here. On an exception the cause and bad-vaddr registers
    /// are written, the pending delayed load is completed, and the exception is
    /// returned for the kernel to handle. A recoverable exception is resumed by
    /// calling `step` again once it has been handled.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the instruction completed and no interrupt is pending.
    pub fn step(&mut self) -> Result<(), Exception> {
        self.run_pipeline().map_err(|e| {
            self.record_exception(e);
            e
        })
    }

    fn run_pipeline(&mut self) -> Result<(), Exception> {
        let if_id = fetch_stage(self)?;
        let id_ex = decode_stage(self, &if_id);
        let ex_wb = execute_stage(self, &id_ex)?;
        wb_stage(self, &ex_wb)?;
        self.stats.instructions_retired += 1;
        self.poll_interrupts()
    }

    /// Parks the most urgent pending interrupt, if any, and reports it.
    fn poll_interrupts(&mut self) -> Result<(), Exception> {
        if self.pending_interrupt.is_some() {
            return Err(Exception::Interrupt);
        }
        let irq = self.interrupts.as_mut().and_then(|c| c.poll());
        match irq {
            Some(irq) => {
                tracing::debug!(source = ?irq.source(), "interrupt pending");
                self.pending_interrupt = Some(irq);
                Err(Exception::Interrupt)
            }
            None => Ok(()),
        }
    }
}
