//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the opcode tables, field extraction, decoding and disassembly for the
//! MIPS I user-mode integer subset executed by the simulator.

/// Register conventions and special register indices.
pub mod abi;

/// Instruction decoding into table entry plus fields.
pub mod decode;

/// Instruction disassembler for debug tracing and diagnostics.
pub mod disasm;

/// Instruction encoding structures and bit extraction utilities.
pub mod instruction;

/// Primary, special and reg-imm opcode tables.
pub mod opcodes;
