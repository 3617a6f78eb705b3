//! Memory Access Helpers.
//!
//! This module provides the interface between the CPU and the memory subsystem.
//! It performs the following:
//! 1. **Address Translation:** Every access goes through the MMU.
//! 2. **Delayed Loads:** Keeps the one pending load and merges it into its register.

use super::{Cpu, DelayedLoad};
use crate::common::{Exception, VirtAddr};
use crate::core::units::lsu::unaligned;

impl Cpu {
    /// Reads `size` bytes at a virtual address, zero-extended.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - The virtual address.
    /// * `size` - Access width in bytes (1, 2, or 4).
    pub fn read_mem(&mut self, vaddr: VirtAddr, size: u32) -> Result<u32, Exception> {
        self.mmu.read(vaddr, size)
    }

    /// Writes the low `size` bytes of `value` at a virtual address.
    pub fn write_mem(&mut self, vaddr: VirtAddr, size: u32, value: u32) -> Result<(), Exception> {
        self.mmu.write(vaddr, size, value)
    }

    /// Completes the pending delayed load and schedules a new one.
    ///
    /// A target of register 0 schedules nothing.
    ///
    /// # Arguments
    ///
    /// * `target` - Destination register of the new load.
    /// * `value` - Loaded value.
    /// * `mask` - Destination bits the load replaces.
    pub fn delayed_load(&mut self, target: usize, value: u32, mask: u32) {
        let prev = std::mem::replace(&mut self.load, DelayedLoad { target, value, mask });
        if prev.target != 0 {
            let current = self.regs.read_u32(prev.target);
            self.regs.write(
                prev.target,
                unaligned::merge(current, prev.value, prev.mask) as i32,
            );
        }
    }

    /// Completes the pending delayed load, if any.
    pub fn finish_load(&mut self) {
        self.delayed_load(0, 0, 0);
    }

    /// Returns the pending delayed load.
    pub const fn pending_load(&self) -> DelayedLoad {
        self.load
    }
}
