//! ALU logical and comparison operations.
//!
//! Comparison is performed on the 64-bit operands, so zero-extended unsigned
//! operands compare as unsigned and sign-extended ones as signed.

use crate::isa::opcodes::Operation;

/// Executes a bitwise or comparison operation.
///
/// # Returns
///
/// The result; `0` for other operations.
pub const fn execute(op: Operation, src1: i64, src2: i64) -> i64 {
    match op {
        Operation::And => src1 & src2,
        Operation::Or => src1 | src2,
        Operation::Xor => src1 ^ src2,
        Operation::Nor => !(src1 | src2),
        Operation::Slt => (src1 < src2) as i64,
        _ => 0,
    }
}
