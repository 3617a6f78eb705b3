//! Instruction Fetch (IF) Stage.
//!
//! Reads the 4-byte instruction word at the current PC. Misalignment and
//! translation failures are raised immediately.

use crate::common::{Exception, VirtAddr};
use crate::core::Cpu;
use crate::core::pipeline::latches::IfIdEntry;
use crate::isa::abi;
use crate::isa::disasm::disassemble_at;

/// Executes the instruction fetch stage.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
///
/// # Returns
///
/// The fetched word and its PC, or the exception raised by translation.
pub fn fetch_stage(cpu: &mut Cpu) -> Result<IfIdEntry, Exception> {
    let pc = cpu.regs.read_u32(abi::REG_PC);
    let inst = cpu.mmu.fetch(VirtAddr::new(pc))?;

    if cpu.trace || cfg!(feature = "always-trace") {
        tracing::trace!(pc = format_args!("{pc:#010x}"), "{}", disassemble_at(inst, pc));
    }

    Ok(IfIdEntry { pc, inst })
}
