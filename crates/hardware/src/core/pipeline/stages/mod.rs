//! Pipeline stage implementations.
//!
//! This module contains the individual implementations of the four stages of the
//! instruction pipeline. It includes:
//! 1. **Fetch:** Reads the instruction word at the PC through translation.
//! 2. **Decode:** Classifies the word and reads operands.
//! 3. **Execute:** Performs ALU operations, memory accesses, and branch resolution.
//! 4. **Writeback:** Checks overflow, commits results, and advances the PC.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Writeback stage implementation.
pub mod writeback;

/// Decode stage entry point (ID stage).
pub use decode::decode_stage;
/// Execute stage entry point (EX stage).
pub use execute::execute_stage;
/// Fetch stage entry point (IF stage).
pub use fetch::fetch_stage;
/// Writeback stage entry point (WB stage).
pub use writeback::wb_stage;
