//! Instruction Decode (ID) Stage.
//!
//! Classifies the fetched word through the opcode tables and prepares every
//! operand the later stages may need: source values, effective address,
//! destination register, branch target, and the fall-through next PC.

use crate::common::constants::{INSTRUCTION_SIZE, JUMP_REGION_MASK};
use crate::core::Cpu;
use crate::core::pipeline::latches::{IdExEntry, IfIdEntry};
use crate::isa::abi;
use crate::isa::decode::decode;
use crate::isa::opcodes::flags::{DSTRA, SRC1SH, SRC2IMM, UNSIGNED};
use crate::isa::opcodes::Format;

/// Mask keeping the low 32 bits of a widened operand.
const WORD_MASK: i64 = 0xFFFF_FFFF;

/// Executes the instruction decode stage.
///
/// Decoding never raises; invalid encodings are rejected by the execute stage.
///
/// # Arguments
///
/// * `cpu` - Reference to the CPU state (registers are only read).
/// * `if_id` - The fetched instruction.
///
/// # Returns
///
/// The ID/EX latch entry for the instruction.
pub fn decode_stage(cpu: &Cpu, if_id: &IfIdEntry) -> IdExEntry {
    let d = decode(if_id.inst);
    let info = d.info;
    let regs = &cpu.regs;

    let reg_next_pc = regs.read_u32(abi::REG_NEXT_PC);
    let next_pc = reg_next_pc.wrapping_add(INSTRUCTION_SIZE);

    let dst_reg = if info.has(DSTRA) {
        Some(abi::REG_RA)
    } else {
        match info.format {
            Format::I => Some(d.rt),
            Format::R => Some(d.rd),
            Format::J | Format::None => None,
        }
    };

    let jump_target = match info.format {
        Format::R => regs.read_u32(d.rs),
        Format::I => reg_next_pc.wrapping_add((d.imm << 2) as u32),
        Format::J => (reg_next_pc & JUMP_REGION_MASK) | (d.target << 2),
        Format::None => 0,
    };

    let unsigned = info.has(UNSIGNED);
    let imm = if unsigned { d.imm & 0xFFFF } else { d.imm };

    // Offsets are signed for every load and store, unsigned ones included.
    let addr = regs.read_u32(d.rs).wrapping_add(d.imm as u32);

    let mut src1 = if info.has(SRC1SH) {
        i64::from(d.shamt)
    } else {
        i64::from(regs.read(d.rs))
    };
    let mut src2 = if info.has(SRC2IMM) {
        i64::from(imm)
    } else {
        i64::from(regs.read(d.rt))
    };
    if unsigned {
        src1 &= WORD_MASK;
        src2 &= WORD_MASK;
    }

    IdExEntry {
        pc: if_id.pc,
        decoded: d,
        imm,
        src1,
        src2,
        addr,
        dst_reg,
        jump_target,
        next_pc,
    }
}
