//! Core processor implementation.
//!
//! This module contains the CPU implementation including the instruction
//! pipeline and the execution units it drives.

/// CPU core implementation and execution orchestration.
pub mod cpu;

/// Instruction pipeline implementation (stages and latches).
pub mod pipeline;

/// Execution units (ALU, LSU, MMU).
pub mod units;

pub use self::cpu::Cpu;
