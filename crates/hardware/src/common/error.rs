//! Machine exceptions and translation results.
//!
//! This module defines how the CPU reports everything that interrupts straight-line
//! execution. It provides:
//! 1. **Exception Representation:** One variant per hardware cause code, carrying the
//!    faulting virtual address where the cause is address-related.
//! 2. **Cause Codes:** The numeric codes written into the cause register.
//! 3. **Translation Results:** The outcome of a virtual-to-physical translation.
//!
//! Exceptions are ordinary values returned from [`Cpu::step`](crate::core::Cpu::step):
//! syscalls and page faults are the normal way control passes from a user program to
//! the kernel, so nothing here unwinds.

use thiserror::Error;

use super::addr::PhysAddr;

/// Numeric exception cause, as stored in the cause register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Cause {
    /// Caused by a `syscall` instruction.
    Syscall = 0,
    /// Caused by an access to a virtual page that is missing or not present.
    PageFault = 1,
    /// Caused by an access to a page not mapped by any TLB entry.
    TlbMiss = 2,
    /// Caused by a write access to a read-only virtual page.
    ReadOnly = 3,
    /// Caused by an access to an invalid physical page.
    BusError = 4,
    /// Caused by an access to a misaligned virtual address.
    AddressError = 5,
    /// Caused by an overflow in a checked signed operation.
    Overflow = 6,
    /// Caused by an attempt to execute an invalid or unimplemented instruction.
    IllegalInstruction = 7,
    /// Caused by an external hardware interrupt.
    Interrupt = 8,
}

impl Cause {
    /// Short human-readable name, padded like the kernel's trace output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Syscall => "syscall",
            Self::PageFault => "page fault",
            Self::TlbMiss => "TLB miss",
            Self::ReadOnly => "read-only",
            Self::BusError => "bus error",
            Self::AddressError => "address error",
            Self::Overflow => "overflow",
            Self::IllegalInstruction => "illegal inst",
            Self::Interrupt => "interrupt",
        }
    }
}

/// A machine exception raised while executing one instruction.
///
/// Address-related variants carry the offending virtual address, which the CPU
/// copies into the bad-vaddr register before returning the exception.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Exception {
    /// A `syscall` instruction was executed.
    #[error("syscall")]
    Syscall,

    /// The virtual page is missing from the page table or not present.
    #[error("page fault at {0:#010x}")]
    PageFault(u32),

    /// No TLB entry maps the address. Reserved; the translator never raises it.
    #[error("TLB miss at {0:#010x}")]
    TlbMiss(u32),

    /// A store targeted a read-only page.
    #[error("write to read-only page at {0:#010x}")]
    ReadOnly(u32),

    /// The resolved physical frame lies outside physical memory.
    #[error("bus error at {0:#010x}")]
    BusError(u32),

    /// The address is not a multiple of the access size.
    #[error("address error at {0:#010x}")]
    AddressError(u32),

    /// A checked add/sub overflowed, or a division failed its consistency check.
    #[error("arithmetic overflow")]
    Overflow,

    /// The word does not decode to an implemented instruction.
    #[error("illegal instruction {0:#010x}")]
    IllegalInstruction(u32),

    /// An external interrupt is pending.
    #[error("interrupt")]
    Interrupt,
}

impl Exception {
    /// Returns the cause code for this exception.
    pub const fn cause(&self) -> Cause {
        match self {
            Self::Syscall => Cause::Syscall,
            Self::PageFault(_) => Cause::PageFault,
            Self::TlbMiss(_) => Cause::TlbMiss,
            Self::ReadOnly(_) => Cause::ReadOnly,
            Self::BusError(_) => Cause::BusError,
            Self::AddressError(_) => Cause::AddressError,
            Self::Overflow => Cause::Overflow,
            Self::IllegalInstruction(_) => Cause::IllegalInstruction,
            Self::Interrupt => Cause::Interrupt,
        }
    }

    /// Returns the faulting virtual address for address-related causes.
    pub const fn bad_vaddr(&self) -> Option<u32> {
        match *self {
            Self::PageFault(addr)
            | Self::TlbMiss(addr)
            | Self::ReadOnly(addr)
            | Self::BusError(addr)
            | Self::AddressError(addr) => Some(addr),
            _ => None,
        }
    }

    /// Returns `true` if the kernel can resume the faulting process after handling.
    ///
    /// Syscalls, page faults and interrupts are normal control transfers; every other
    /// cause is fatal to the process that raised it.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Syscall | Self::PageFault(_) | Self::Interrupt)
    }
}

/// Result of a virtual-to-physical address translation.
pub type TranslationResult = Result<PhysAddr, Exception>;
