//! MIPS Instruction Decoder.
//!
//! This module handles the decoding of 32-bit MIPS instruction encodings into
//! a structured `Decoded` format. It classifies the word through the opcode
//! tables and extracts every field, sign-extending the immediate. Operand
//! selection (register, immediate or shift amount) is left to the decode stage,
//! which has access to the register file.

use crate::isa::instruction::{Decoded, InstructionBits};
use crate::isa::opcodes;

/// Decodes a 32-bit instruction word.
///
/// Decoding never fails: unassigned encodings decode to an entry whose
/// operation is [`Operation::Invalid`](crate::isa::opcodes::Operation::Invalid),
/// and the exception is raised when that operation executes.
///
/// # Arguments
///
/// * `inst` - The raw 32-bit instruction encoding.
///
/// # Returns
///
/// A `Decoded` struct containing the table entry and all extracted fields.
pub fn decode(inst: u32) -> Decoded {
    Decoded {
        raw: inst,
        info: opcodes::lookup(inst),
        rs: inst.rs(),
        rt: inst.rt(),
        rd: inst.rd(),
        shamt: inst.shamt(),
        target: inst.target(),
        imm: inst.imm(),
    }
}
