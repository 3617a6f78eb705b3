//! Exception Recording.
//!
//! Before an exception leaves the CPU, the cause register receives its code and,
//! for address-related causes, the bad-vaddr register receives the faulting
//! address. The delayed load in flight is completed so that the kernel sees a
//! consistent register file.

use super::Cpu;
use crate::common::Exception;
use crate::isa::abi;

impl Cpu {
    /// Records `exception` in the cause and bad-vaddr registers.
    ///
    /// # Arguments
    ///
    /// * `exception` - The exception about to be returned from `step`.
    pub fn record_exception(&mut self, exception: Exception) {
        self.regs.write(abi::REG_CAUSE, exception.cause() as i32);
        if let Some(addr) = exception.bad_vaddr() {
            self.regs.write(abi::REG_BAD_VADDR, addr as i32);
        }
        self.finish_load();
        self.stats.record_exception(&exception);
    }
}
