//! Instruction pipeline implementation.
//!
//! One call to [`Cpu::step`](crate::core::Cpu::step) carries a single
//! instruction through every stage before the next one starts. It includes:
//! 1. **Latches:** Inter-stage buffers for communication between stages.
//! 2. **Stages:** Fetch, Decode, Execute and Writeback.

/// Inter-stage pipeline latches (IF/ID, ID/EX, EX/WB).
pub mod latches;

/// Pipeline stage implementations.
pub mod stages;
