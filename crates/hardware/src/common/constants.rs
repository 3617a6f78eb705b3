//! Global System Constants.
//!
//! This module defines system-wide constants used across the simulator. It includes:
//! 1. **Memory Constants:** Page size, shifts, and masks for address decomposition.
//! 2. **Register Constants:** The size of the architectural register file.
//! 3. **Instruction Constants:** Field positions used by the decoder.

/// Page (and physical frame) size in bytes (1 KiB).
pub const PAGE_SIZE: u32 = 0x400;

/// Number of bits to shift to convert between bytes and pages.
pub const PAGE_SHIFT: u32 = 10;

/// Mask for extracting the page offset from an address.
pub const PAGE_OFFSET_MASK: u32 = PAGE_SIZE - 1;

/// Total number of software-visible CPU registers (32 GPRs plus lo, hi, pc, next-pc, cause, bad-vaddr).
pub const NUM_REGISTERS: usize = 38;

/// Number of general-purpose registers.
pub const NUM_GPRS: usize = 32;

/// Size of every MIPS instruction in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Bit position of the primary opcode field.
pub const OPCODE_SHIFT: u32 = 26;

/// Bit position of the `rs` register field.
pub const RS_SHIFT: u32 = 21;

/// Bit position of the `rt` register field.
pub const RT_SHIFT: u32 = 16;

/// Bit position of the `rd` register field.
pub const RD_SHIFT: u32 = 11;

/// Bit position of the shift-amount field.
pub const SHAMT_SHIFT: u32 = 6;

/// Mask for any 5-bit register or shift field.
pub const REG_FIELD_MASK: u32 = 0x1F;

/// Mask for the 6-bit opcode and function fields.
pub const OP_FIELD_MASK: u32 = 0x3F;

/// Mask for the 26-bit J-format jump target.
pub const TARGET_MASK: u32 = 0x03FF_FFFF;

/// Upper address bits preserved by J-format jumps (the current 256 MiB region).
pub const JUMP_REGION_MASK: u32 = 0xF000_0000;

/// Number of instructions between status messages when tracing.
pub const STATUS_UPDATE_INTERVAL: u64 = 5_000_000;
