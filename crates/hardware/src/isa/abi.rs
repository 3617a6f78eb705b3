//! MIPS register conventions.
//!
//! Defines the register indices used by the syscall convention and the
//! special registers that follow the 32 general-purpose ones.

/// Register 0 (hardwired to zero).
pub const REG_ZERO: usize = 0;
/// Register 2 (syscall number in, return value out, v0).
pub const REG_V0: usize = 2;
/// Register 3 (second return value, v1).
pub const REG_V1: usize = 3;
/// Register 4 (first argument, a0).
pub const REG_A0: usize = 4;
/// Register 5 (second argument, a1).
pub const REG_A1: usize = 5;
/// Register 6 (third argument, a2).
pub const REG_A2: usize = 6;
/// Register 7 (fourth argument, a3).
pub const REG_A3: usize = 7;
/// Register 29 (stack pointer, sp).
pub const REG_SP: usize = 29;
/// Register 31 (return address, ra).
pub const REG_RA: usize = 31;

/// Low half of a multiply result, or division quotient.
pub const REG_LO: usize = 32;
/// High half of a multiply result, or division remainder.
pub const REG_HI: usize = 33;
/// Program counter.
pub const REG_PC: usize = 34;
/// Address of the instruction after the one at `pc`.
pub const REG_NEXT_PC: usize = 35;
/// Cause code of the most recent exception.
pub const REG_CAUSE: usize = 36;
/// Faulting virtual address of the most recent address exception.
pub const REG_BAD_VADDR: usize = 37;

/// Conventional names of the 32 general-purpose registers.
pub const REG_NAMES: [&str; 32] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", "t0", "t1", "t2", "t3", "t4", "t5", "t6",
    "t7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "t8", "t9", "k0", "k1", "gp", "sp",
    "s8", "ra",
];
