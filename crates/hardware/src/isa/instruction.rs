//! Instruction encoding and decoding utilities.
//!
//! Provides bit extraction functions and structures for decoding
//! MIPS instruction fields from 32-bit instruction encodings.

use crate::common::constants::{
    OP_FIELD_MASK, OPCODE_SHIFT, RD_SHIFT, REG_FIELD_MASK, RS_SHIFT, RT_SHIFT, SHAMT_SHIFT,
    TARGET_MASK,
};
use crate::isa::opcodes::OpInfo;

/// Trait for extracting instruction fields from encoded instructions.
///
/// Provides methods to extract every MIPS instruction field from a 32-bit
/// instruction encoding. Fields are extracted unconditionally; which of them
/// are meaningful depends on the instruction format.
pub trait InstructionBits {
    /// Extracts the primary opcode field (bits 26-31).
    fn opcode(&self) -> u32;

    /// Extracts the first source register field (bits 21-25).
    fn rs(&self) -> usize;

    /// Extracts the second source register field (bits 16-20).
    ///
    /// Also selects the operation for reg-imm instructions.
    fn rt(&self) -> usize;

    /// Extracts the destination register field of R-format instructions (bits 11-15).
    fn rd(&self) -> usize;

    /// Extracts the shift amount field (bits 6-10).
    fn shamt(&self) -> u32;

    /// Extracts the function field of special instructions (bits 0-5).
    fn funct(&self) -> u32;

    /// Extracts the 26-bit jump target field of J-format instructions.
    fn target(&self) -> u32;

    /// Extracts the 16-bit immediate field, sign-extended to 32 bits.
    fn imm(&self) -> i32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        (self >> OPCODE_SHIFT) & OP_FIELD_MASK
    }

    #[inline(always)]
    fn rs(&self) -> usize {
        ((self >> RS_SHIFT) & REG_FIELD_MASK) as usize
    }

    #[inline(always)]
    fn rt(&self) -> usize {
        ((self >> RT_SHIFT) & REG_FIELD_MASK) as usize
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> RD_SHIFT) & REG_FIELD_MASK) as usize
    }

    #[inline(always)]
    fn shamt(&self) -> u32 {
        (self >> SHAMT_SHIFT) & REG_FIELD_MASK
    }

    #[inline(always)]
    fn funct(&self) -> u32 {
        self & OP_FIELD_MASK
    }

    #[inline(always)]
    fn target(&self) -> u32 {
        self & TARGET_MASK
    }

    /// Reinterprets the low half-word as `i16` and widens it, which sign-extends.
    #[inline(always)]
    fn imm(&self) -> i32 {
        i32::from(*self as u16 as i16)
    }
}

/// Decoded instruction structure containing all extracted fields.
///
/// The register operands are indices only. Operand values are read from the
/// register file in the decode stage.
#[derive(Clone, Copy, Debug)]
pub struct Decoded {
    /// Raw 32-bit instruction encoding.
    pub raw: u32,
    /// Table entry describing the operation.
    pub info: &'static OpInfo,
    /// First source register index.
    pub rs: usize,
    /// Second source register index.
    pub rt: usize,
    /// R-format destination register index.
    pub rd: usize,
    /// Shift amount.
    pub shamt: u32,
    /// J-format target field.
    pub target: u32,
    /// Sign-extended immediate.
    pub imm: i32,
}
