//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the entry types carried between the four stages of one
//! instruction: Fetch → Decode → Execute → Writeback.
//!
//! 1. **Instruction Flow:** Each latch carries exactly what the next stage needs.
//! 2. **Operand Capture:** Register operands are read once, in decode, so later
//!    stages never observe a register written by the same instruction.

use crate::isa::instruction::Decoded;
use crate::isa::opcodes::OpInfo;

/// Entry in the IF/ID latch (Fetch to Decode).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IfIdEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// 32-bit instruction encoding.
    pub inst: u32,
}

/// Entry in the ID/EX latch (Decode to Execute).
#[derive(Clone, Copy, Debug)]
pub struct IdExEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Decoded instruction fields and table entry.
    pub decoded: Decoded,
    /// Immediate after unsigned masking.
    pub imm: i32,
    /// First operand: shift amount or `rs`, sign- or zero-extended.
    pub src1: i64,
    /// Second operand: immediate or `rt`, sign- or zero-extended.
    pub src2: i64,
    /// Effective address `rs + imm` for loads and stores.
    pub addr: u32,
    /// Destination register, if the format names one.
    pub dst_reg: Option<usize>,
    /// Branch or jump target.
    pub jump_target: u32,
    /// Value `next_pc` takes if no branch is taken.
    pub next_pc: u32,
}

/// Entry in the EX/WB latch (Execute to Writeback).
#[derive(Clone, Copy, Debug)]
pub struct ExWbEntry {
    /// Table entry of the instruction.
    pub info: &'static OpInfo,
    /// Untruncated result.
    pub dst: i64,
    /// Destination register, if the format names one.
    pub dst_reg: Option<usize>,
    /// Destination bits affected by a delayed load.
    pub mask: u32,
    /// Branch condition outcome; always true for jumps.
    pub taken: bool,
    /// Branch or jump target.
    pub jump_target: u32,
    /// Value `next_pc` takes if no branch is taken.
    pub next_pc: u32,
}
