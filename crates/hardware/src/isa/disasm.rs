//! Instruction Disassembler for the MIPS subset.
//!
//! Converts a 32-bit instruction encoding into a human-readable mnemonic
//! string for debug tracing, logging, and test diagnostics. Rendering is
//! driven by the argument format string carried in each opcode table entry.
//!
//! # Usage
//!
//! ```
//! use mipsim_core::isa::disasm::disassemble;
//! let text = disassemble(0x2408_0005); // addiu $t0, $zero, 5
//! assert_eq!(text, "addiu $t0, $zero, 5");
//! ```

use std::fmt::Write;

use crate::common::constants::{INSTRUCTION_SIZE, JUMP_REGION_MASK};
use crate::isa::abi::{REG_NAMES, REG_RA};
use crate::isa::decode::decode;
use crate::isa::opcodes::{Format, Operation};

/// Returns the conventional name for a general-purpose register index.
#[inline]
fn reg(idx: usize) -> &'static str {
    REG_NAMES.get(idx).copied().unwrap_or("??")
}

/// Disassembles an instruction as if it were located at address 0.
///
/// Branch and jump targets are therefore shown relative to the start of the
/// address space; use [`disassemble_at`] when the PC is known.
///
/// # Arguments
///
/// * `inst` - The raw 32-bit instruction encoding.
pub fn disassemble(inst: u32) -> String {
    disassemble_at(inst, 0)
}

/// Disassembles a 32-bit MIPS instruction located at `pc`.
///
/// Returns a mnemonic like `"addu $v0, $a0, $a1"`, or `"invalid"` followed by
/// the raw word for unassigned encodings.
///
/// # Arguments
///
/// * `inst` - The raw 32-bit instruction encoding.
/// * `pc` - Address of the instruction, used to resolve branch targets.
pub fn disassemble_at(inst: u32, pc: u32) -> String {
    let d = decode(inst);
    let info = d.info;

    if info.op == Operation::Invalid {
        return format!("invalid {inst:#010x}");
    }

    let next_pc = pc.wrapping_add(INSTRUCTION_SIZE);
    let mut out = String::from(info.name);
    let mut first = true;

    for c in info.args.chars() {
        if c == 'r' && d.rd == REG_RA {
            continue;
        }
        out.push_str(if first { " " } else { ", " });
        first = false;

        let _ = match c {
            's' => write!(out, "${}", reg(d.rs)),
            't' => write!(out, "${}", reg(d.rt)),
            'd' | 'r' => write!(out, "${}", reg(d.rd)),
            'i' => write!(out, "{}", d.imm),
            'h' => write!(out, "{}", d.shamt),
            'a' => write!(out, "{}(${})", d.imm, reg(d.rs)),
            'j' => {
                let target = if info.format == Format::J {
                    (next_pc & JUMP_REGION_MASK) | (d.target << 2)
                } else {
                    next_pc.wrapping_add((d.imm << 2) as u32)
                };
                write!(out, "{target:#010x}")
            }
            _ => Ok(()),
        };
    }

    out
}
