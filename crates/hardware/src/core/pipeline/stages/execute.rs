//! Execute (EX) Stage.
//!
//! This module implements the execution stage. It performs the following:
//! 1. **Arithmetic:** ALU operations, and multiply/divide into hi/lo.
//! 2. **Branch Resolution:** Evaluates branch conditions; targets come from decode.
//! 3. **Memory Access:** Loads and stores through address translation, including
//!    the partial-word merges of `lwl`, `lwr`, `swl` and `swr`.
//! 4. **Exceptions:** Raises syscall, divide overflow, and illegal instruction.

use crate::common::{Exception, VirtAddr};
use crate::core::Cpu;
use crate::core::pipeline::latches::{ExWbEntry, IdExEntry};
use crate::core::units::alu::{Alu, arithmetic};
use crate::core::units::lsu::{self, unaligned};
use crate::isa::abi;
use crate::isa::opcodes::Operation;
use crate::isa::opcodes::flags::UNSIGNED;

/// Executes the execute stage of the pipeline.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
/// * `id_ex` - The decoded instruction and its operands.
///
/// # Returns
///
/// The EX/WB latch entry, or the exception the instruction raised.
pub fn execute_stage(cpu: &mut Cpu, id_ex: &IdExEntry) -> Result<ExWbEntry, Exception> {
    let info = id_ex.decoded.info;
    let (src1, src2) = (id_ex.src1, id_ex.src2);
    let addr = id_ex.addr;

    let mut dst: i64 = 0;
    let mut mask = u32::MAX;
    let mut taken = true;

    match info.op {
        Operation::Add
        | Operation::Sub
        | Operation::Sll
        | Operation::Srl
        | Operation::Sra
        | Operation::Slt
        | Operation::And
        | Operation::Or
        | Operation::Nor
        | Operation::Xor => dst = Alu::execute(info.op, src1, src2),

        Operation::Mult => {
            let (lo, hi) = arithmetic::mult(src1, src2);
            cpu.regs.write(abi::REG_LO, lo);
            cpu.regs.write(abi::REG_HI, hi);
        }
        Operation::Div => {
            let (lo, hi) = arithmetic::div(src1, src2, info.has(UNSIGNED))?;
            cpu.regs.write(abi::REG_LO, lo);
            cpu.regs.write(abi::REG_HI, hi);
        }

        Operation::Lui => dst = i64::from(((id_ex.imm as u32) << 16) as i32),

        Operation::Beq => taken = src1 == src2,
        Operation::Bne => taken = src1 != src2,
        Operation::Bgez => taken = src1 >= 0,
        Operation::Bgtz => taken = src1 > 0,
        Operation::Blez => taken = src1 <= 0,
        Operation::Bltz => taken = src1 < 0,
        Operation::Jump => {}

        Operation::Mflo => dst = i64::from(cpu.regs.read(abi::REG_LO)),
        Operation::Mfhi => dst = i64::from(cpu.regs.read(abi::REG_HI)),
        Operation::Mtlo => cpu.regs.write(abi::REG_LO, src1 as i32),
        Operation::Mthi => cpu.regs.write(abi::REG_HI, src1 as i32),

        Operation::Syscall => return Err(Exception::Syscall),

        Operation::Load => {
            let size = info.access_size();
            let value = cpu.read_mem(VirtAddr::new(addr), size)?;
            dst = if info.has(UNSIGNED) {
                i64::from(value)
            } else {
                i64::from(lsu::sign_extend(value, size))
            };
        }
        Operation::Lwl | Operation::Lwr => {
            let word = cpu.read_mem(VirtAddr::new(unaligned::word_base(addr)), 4)?;
            let (value, m) = if info.op == Operation::Lwl {
                unaligned::lwl(word, addr)
            } else {
                unaligned::lwr(word, addr)
            };
            dst = i64::from(value);
            mask = m;
        }
        Operation::Store => {
            cpu.write_mem(VirtAddr::new(addr), info.access_size(), src2 as u32)?;
        }
        Operation::Swl | Operation::Swr => {
            let base = VirtAddr::new(unaligned::word_base(addr));
            let mem = cpu.read_mem(base, 4)?;
            let merged = if info.op == Operation::Swl {
                unaligned::swl(mem, src2 as u32, addr)
            } else {
                unaligned::swr(mem, src2 as u32, addr)
            };
            cpu.write_mem(base, 4, merged)?;
        }

        Operation::Unimpl => {
            tracing::warn!(
                pc = format_args!("{:#010x}", id_ex.pc),
                "unimplemented instruction {}",
                info.name
            );
            return Err(Exception::IllegalInstruction(id_ex.decoded.raw));
        }
        Operation::Invalid => {
            return Err(Exception::IllegalInstruction(id_ex.decoded.raw));
        }
    }

    Ok(ExWbEntry {
        info,
        dst,
        dst_reg: id_ex.dst_reg,
        mask,
        taken,
        jump_target: id_ex.jump_target,
        next_pc: id_ex.next_pc,
    })
}
