//! Memory Access Types.
//!
//! This module defines the classification of memory accesses issued by the CPU.
//! These types are used for the following:
//! 1. **Permission Validation:** Only writes are refused by read-only pages.
//! 2. **Page Bookkeeping:** Writes mark the page dirty, every access marks it used.
//! 3. **Statistics Tracking:** Categorizing memory operations for analysis.

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch. Translated as a 4-byte read.
    Fetch,

    /// Data read during a load instruction.
    Read,

    /// Data write during a store instruction.
    Write,
}

impl AccessType {
    /// Returns `true` for accesses that modify memory.
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}
