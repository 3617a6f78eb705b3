//! MIPS system simulator library.
//!
//! This crate implements an educational MIPS-subset simulator running user programs
//! under a demand-paged virtual memory manager, with the following:
//! 1. **Core:** Fetch, decode, execute and writeback with delayed branches and delayed loads.
//! 2. **Memory:** Address translation through per-process page tables over physical frames.
//! 3. **ISA:** Decode tables, disassembly and the register ABI for the supported subset.
//! 4. **Kernel:** Processes, round-robin scheduling, page replacement and fault handling.
//! 5. **SoC:** Physical memory, interrupt delivery and the scheduling timer.
//! 6. **Storage:** Backing stores and per-process swap files.
//! 7. **Simulation:** Loader, configuration, and statistics collection.

/// Common types and constants (addresses, registers, exceptions, access types).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// CPU core (pipeline, execution units, MMU, exception recording).
pub mod core;
/// Instruction set (decode tables, instruction fields, ABI, disassembly).
pub mod isa;
/// Kernel (process table, scheduler, page replacement, fault handling, syscalls).
pub mod kernel;
/// Program loader and top-level simulator.
pub mod sim;
/// System-on-chip (physical memory, interrupts, timer).
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;
/// Backing stores and swap space.
pub mod storage;

/// Root configuration type; use `Config::default()` or parse one with `Config::from_json`.
pub use crate::config::Config;
/// Main CPU type; holds registers, MMU and stats.
pub use crate::core::Cpu;
/// Kernel running processes on a `Cpu`.
pub use crate::kernel::Kernel;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
