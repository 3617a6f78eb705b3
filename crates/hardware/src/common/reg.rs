//! Architectural Register File.
//!
//! This module provides the `RegisterFile` struct holding every software-visible CPU
//! register. It provides:
//! 1. **Storage:** 32 general-purpose registers plus lo, hi, pc, next-pc, cause and bad-vaddr.
//! 2. **Invariant Enforcement:** Register 0 is hardwired to zero.
//! 3. **Context Switching:** The whole file is `Clone` so the kernel can snapshot and
//!    restore it verbatim.

use std::fmt;

use super::constants::NUM_REGISTERS;

/// The 38 signed 32-bit registers of one execution context.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [i32; NUM_REGISTERS],
}

impl RegisterFile {
    /// Creates a register file with every register set to zero.
    pub const fn new() -> Self {
        Self {
            regs: [0; NUM_REGISTERS],
        }
    }

    /// Reads a register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-37). Register 0 always returns 0.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a valid register index.
    #[inline(always)]
    pub fn read(&self, idx: usize) -> i32 {
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes a register. Writes to register 0 are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a valid register index.
    #[inline(always)]
    pub fn write(&mut self, idx: usize, val: i32) {
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    /// Reads a register as an unsigned 32-bit value.
    #[inline(always)]
    pub fn read_u32(&self, idx: usize) -> u32 {
        self.read(idx) as u32
    }

    /// Returns a copy of all registers, in index order.
    pub const fn snapshot(&self) -> [i32; NUM_REGISTERS] {
        self.regs
    }

    /// Dumps the general-purpose registers, four per line, at debug level.
    pub fn dump(&self) {
        for i in (0..32).step_by(4) {
            tracing::debug!(
                "r{:<2}={:#010x} r{:<2}={:#010x} r{:<2}={:#010x} r{:<2}={:#010x}",
                i,
                self.regs[i],
                i + 1,
                self.regs[i + 1],
                i + 2,
                self.regs[i + 2],
                i + 3,
                self.regs[i + 3]
            );
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterFile")
            .field("pc", &format_args!("{:#010x}", self.regs[34]))
            .field("next_pc", &format_args!("{:#010x}", self.regs[35]))
            .field("gprs", &&self.regs[..32])
            .finish_non_exhaustive()
    }
}
