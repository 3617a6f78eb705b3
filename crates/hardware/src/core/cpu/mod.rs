//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which serves as the container for the
//! entire processor state. It coordinates the following:
//! 1. **State Management:** Maintains the register file and the pending delayed load.
//! 2. **Pipeline Control:** Drives one instruction through fetch, decode, execute, writeback.
//! 3. **Memory:** Owns the MMU, and through it physical memory and the active page table.
//! 4. **System Integration:** Polls the interrupt controller between instructions.

/// Instruction execution orchestration and interrupt polling.
pub mod execution;

/// Memory access through translation and delayed-load bookkeeping.
pub mod memory;

/// Exception recording before control passes to the kernel.
pub mod trap;

use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::RegisterFile;
use crate::config::Config;
use crate::core::units::mmu::Mmu;
use crate::isa::abi;
use crate::soc::interrupt::{Interrupt, InterruptController};
use crate::soc::memory::PhysicalMemory;
use crate::stats::SimStats;

/// A load whose value reaches its register one instruction late.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DelayedLoad {
    /// Destination register; 0 means no load is pending.
    pub target: usize,
    /// Loaded value.
    pub value: u32,
    /// Destination bits replaced by the load.
    pub mask: u32,
}

/// Main CPU structure containing all processor state and components.
#[derive(Debug)]
pub struct Cpu {
    /// General purpose and special registers.
    pub regs: RegisterFile,
    /// Memory Management Unit.
    pub mmu: Mmu,
    /// Simulation statistics.
    pub stats: SimStats,
    /// Emit a trace event for every fetched instruction.
    pub trace: bool,

    load: DelayedLoad,
    interrupts: Option<InterruptController>,
    pending_interrupt: Option<Interrupt>,
}

impl Cpu {
    /// Creates a CPU with zeroed registers and physical memory sized by `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Simulator configuration.
    pub fn new(config: &Config) -> Self {
        let memory = PhysicalMemory::new(config.memory.num_phys_pages);
        Self::with_mmu(Mmu::new(memory, config.memory.vm_enabled), config.general.trace_instructions)
    }

    /// Creates a CPU around an existing MMU.
    pub fn with_mmu(mmu: Mmu, trace: bool) -> Self {
        Self {
            regs: RegisterFile::new(),
            mmu,
            stats: SimStats::default(),
            trace,
            load: DelayedLoad::default(),
            interrupts: None,
            pending_interrupt: None,
        }
    }

    /// Returns the current program counter.
    pub fn pc(&self) -> u32 {
        self.regs.read_u32(abi::REG_PC)
    }

    /// Jumps to `pc`, with `next_pc` set to the following instruction.
    pub fn set_pc(&mut self, pc: u32) {
        self.regs.write(abi::REG_PC, pc as i32);
        self.regs
            .write(abi::REG_NEXT_PC, pc.wrapping_add(INSTRUCTION_SIZE) as i32);
    }

    /// Advances the PC: `pc` takes the old `next_pc` and `next_pc` takes `next`.
    ///
    /// Called by writeback after every instruction, and by the kernel to step
    /// past a syscall.
    pub fn advance_pc(&mut self, next: u32) {
        let next_pc = self.regs.read(abi::REG_NEXT_PC);
        self.regs.write(abi::REG_PC, next_pc);
        self.regs.write(abi::REG_NEXT_PC, next as i32);
    }

    /// Attaches an interrupt controller, returning the previous one.
    pub fn attach_interrupts(
        &mut self,
        controller: InterruptController,
    ) -> Option<InterruptController> {
        self.interrupts.replace(controller)
    }

    /// Returns the attached interrupt controller, creating one if none is attached.
    pub fn interrupt_controller(&mut self) -> &mut InterruptController {
        self.interrupts.get_or_insert_with(InterruptController::new)
    }

    /// Removes and returns the interrupt that caused the last `Exception::Interrupt`.
    pub fn take_interrupt(&mut self) -> Option<Interrupt> {
        self.pending_interrupt.take()
    }
}
