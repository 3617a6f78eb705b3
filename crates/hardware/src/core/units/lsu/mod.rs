//! Load/Store Unit (LSU).
//!
//! Helpers for the data side of memory instructions:
//! - sign extension of sub-word loads
//! - [`unaligned`]: the byte-merging of `lwl`, `lwr`, `swl` and `swr`

/// Partial-word load and store merging.
pub mod unaligned;

/// Sign-extends a `size`-byte value read from memory to 32 bits.
///
/// # Arguments
///
/// * `value` - Zero-extended value as returned by physical memory.
/// * `size` - Access width in bytes (1, 2, or 4).
#[inline]
pub const fn sign_extend(value: u32, size: u32) -> i32 {
    match size {
        1 => value as u8 as i8 as i32,
        2 => value as u16 as i16 as i32,
        _ => value as i32,
    }
}
