//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer ALU used in the Execute stage.
//! Operands arrive as 64-bit values: sign-extended 32-bit registers for signed
//! instructions, zero-extended ones for unsigned instructions. Results keep the
//! carry into bit 32 so that the writeback stage can detect signed overflow.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub, Mult, Div and the overflow test
//! - [`logic`]:      And, Or, Xor, Nor, Slt
//! - [`shifts`]:     Sll, Srl, Sra

/// Integer arithmetic operations (add, subtract, multiply, divide).
pub mod arithmetic;

/// Bitwise logical and comparison operations.
pub mod logic;

/// Shift operations.
pub mod shifts;

use crate::isa::opcodes::Operation;

/// Arithmetic Logic Unit (ALU) for single-result integer operations.
///
/// Multiply and divide write hi/lo and are called directly through
/// [`arithmetic`] by the execute stage.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes an integer ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op`   - The operation to perform
    /// * `src1` - First operand (shift amount for shifts)
    /// * `src2` - Second operand (value shifted for shifts)
    ///
    /// # Returns
    ///
    /// The untruncated result. Only the low 32 bits reach a register; bit 32 is
    /// kept for the overflow check. Returns `0` for non-ALU operations.
    ///
    /// # Examples
    ///
    /// ```
    /// use mipsim_core::core::units::alu::Alu;
    /// use mipsim_core::isa::opcodes::Operation;
    ///
    /// assert_eq!(Alu::execute(Operation::Add, 42, 8), 50);
    /// assert_eq!(Alu::execute(Operation::Sll, 4, 1), 0x10);
    /// assert_eq!(Alu::execute(Operation::Slt, -5, 10), 1);
    /// assert_eq!(Alu::execute(Operation::Srl, 4, -16), 0x0FFF_FFFF);
    /// ```
    pub fn execute(op: Operation, src1: i64, src2: i64) -> i64 {
        match op {
            Operation::Add | Operation::Sub => arithmetic::execute(op, src1, src2),
            Operation::And
            | Operation::Or
            | Operation::Xor
            | Operation::Nor
            | Operation::Slt => logic::execute(op, src1, src2),
            Operation::Sll | Operation::Srl | Operation::Sra => shifts::execute(op, src1, src2),
            _ => 0,
        }
    }
}
