//! Common utilities and types used throughout the MIPS simulator.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the simulator. It includes:
//! 1. **Address Types:** Strong types for virtual and physical addresses.
//! 2. **Constants:** Page geometry, register counts and instruction field positions.
//! 3. **Memory Access:** Definitions for categorizing memory operations (Fetch/Read/Write).
//! 4. **Error Handling:** Machine exceptions and translation result types.
//! 5. **Register Management:** The 38-entry architectural register file.

/// Address type definitions (physical and virtual addresses).
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Exception and cause definitions.
pub mod error;

/// Register file implementation.
pub mod reg;

/// Process identifier; also the process's slot index in the process table.
pub type Pid = usize;

pub use addr::{PhysAddr, VirtAddr};
pub use constants::{NUM_REGISTERS, PAGE_SHIFT, PAGE_SIZE};
pub use data::AccessType;
pub use error::{Cause, Exception, TranslationResult};
pub use reg::RegisterFile;
