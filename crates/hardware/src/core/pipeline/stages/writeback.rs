//! Writeback (WB) Stage.
//!
//! This module implements the final stage of the instruction pipeline. In order:
//! 1. **Overflow:** Checked instructions whose result does not fit raise here,
//!    before any register changes.
//! 2. **Delayed Loads:** Loads schedule their value for the next writeback; every
//!    other instruction completes the pending load first.
//! 3. **Results:** The destination register is written (the return address for links).
//! 4. **PC Update:** Taken branches redirect `next_pc`, then the PC advances, which
//!    realizes the single branch delay slot.

use crate::common::Exception;
use crate::core::Cpu;
use crate::core::pipeline::latches::ExWbEntry;
use crate::core::units::alu::arithmetic;
use crate::isa::opcodes::flags::{BRANCH, DELAYEDLOAD, DST, LINK, OVERFLOW};

/// Executes the writeback stage of the pipeline.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
/// * `ex_wb` - The executed instruction.
///
/// # Returns
///
/// `Ok(())`, or [`Exception::Overflow`] for a checked instruction that overflowed.
pub fn wb_stage(cpu: &mut Cpu, ex_wb: &ExWbEntry) -> Result<(), Exception> {
    let info = ex_wb.info;

    if info.has(OVERFLOW) && arithmetic::overflowed(ex_wb.dst) {
        return Err(Exception::Overflow);
    }

    let dst_reg = ex_wb.dst_reg.unwrap_or(0);

    if info.has(DELAYEDLOAD) {
        cpu.delayed_load(dst_reg, ex_wb.dst as u32, ex_wb.mask);
    } else {
        cpu.finish_load();
    }

    let value = if info.has(LINK) {
        ex_wb.next_pc as i32
    } else {
        ex_wb.dst as i32
    };

    if info.has(DST) {
        cpu.regs.write(dst_reg, value);
    }

    let next_pc = if info.has(BRANCH) && ex_wb.taken {
        ex_wb.jump_target
    } else {
        ex_wb.next_pc
    };

    cpu.advance_pc(next_pc);
    Ok(())
}
