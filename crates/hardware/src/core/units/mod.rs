//! Execution units and functional components.
//!
//! This module contains the processor's execution units: the integer ALU,
//! the load/store helpers, and the memory management unit.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Load/Store Unit helpers for sub-word and unaligned accesses.
pub mod lsu;

/// Memory Management Unit with page tables.
pub mod mmu;
