//! ALU shift operations.
//!
//! Shift amounts are masked to 5 bits. The value shifted is the low 32 bits
//! of `src2`; results are sign-extended from bit 31.

use crate::isa::opcodes::Operation;

/// Bit mask for the shift amount (5 bits: 0-31).
const SHAMT_MASK: u32 = 0x1F;

/// Executes a shift operation.
///
/// # Arguments
///
/// * `op`   - The shift to perform.
/// * `src1` - Shift amount (low 5 bits used).
/// * `src2` - Value to shift.
///
/// # Returns
///
/// The shifted value; `0` for other operations.
pub const fn execute(op: Operation, src1: i64, src2: i64) -> i64 {
    let sh = src1 as u32 & SHAMT_MASK;
    let value = src2 as u32;
    match op {
        Operation::Sll => (value << sh) as i32 as i64,
        Operation::Srl => (value >> sh) as i32 as i64,
        Operation::Sra => ((value as i32) >> sh) as i64,
        _ => 0,
    }
}
