//! ALU arithmetic operations.
//!
//! Implements addition and subtraction with overflow detection, and the
//! hi/lo-producing multiply and divide.

use crate::common::Exception;
use crate::isa::opcodes::Operation;

/// Number of bits in a register.
const WORD_BITS: u32 = 32;

/// Executes an addition or subtraction.
///
/// # Arguments
///
/// * `op`   - `Add` or `Sub`.
/// * `src1` - First operand.
/// * `src2` - Second operand.
///
/// # Returns
///
/// The full-precision result; `0` for other operations.
pub fn execute(op: Operation, src1: i64, src2: i64) -> i64 {
    match op {
        Operation::Add => src1.wrapping_add(src2),
        Operation::Sub => src1.wrapping_sub(src2),
        _ => 0,
    }
}

/// Returns `true` if a full-precision result does not fit a signed 32-bit register.
///
/// The carry into bit 32 must equal bit 31 for the truncated result to be exact.
#[inline]
pub const fn overflowed(result: i64) -> bool {
    ((result >> 31) & 1) != ((result >> 32) & 1)
}

/// Multiplies two operands into a `(lo, hi)` register pair.
///
/// Both signed and unsigned operands fit in 33 bits, so the low 64 bits of the
/// product are exact for either interpretation.
pub const fn mult(src1: i64, src2: i64) -> (i32, i32) {
    let product = src1.wrapping_mul(src2);
    (product as i32, (product >> WORD_BITS) as i32)
}

/// Divides two operands into a `(lo, hi)` = (quotient, remainder) register pair.
///
/// The division is checked: the quotient as stored in lo, times the divisor,
/// plus the remainder must reconstruct the dividend. A zero divisor fails the
/// check by definition.
///
/// # Arguments
///
/// * `src1` - Dividend.
/// * `src2` - Divisor.
/// * `unsigned` - Interpret the stored quotient as unsigned when reconstructing.
///
/// # Returns
///
/// The register pair, or [`Exception::Overflow`].
pub const fn div(src1: i64, src2: i64, unsigned: bool) -> Result<(i32, i32), Exception> {
    if src2 == 0 {
        return Err(Exception::Overflow);
    }
    let lo = (src1 / src2) as i32;
    let hi = (src1 % src2) as i32;
    let quotient = if unsigned { lo as u32 as i64 } else { lo as i64 };
    if quotient * src2 + hi as i64 != src1 {
        return Err(Exception::Overflow);
    }
    Ok((lo, hi))
}
