//! Unaligned word access.
//!
//! `lwl`/`lwr` and `swl`/`swr` operate on the aligned word containing the
//! address. The low two address bits decide how many bytes of the existing
//! value are preserved; the rest come from the other side of the transfer.
//! Loads produce a value and a mask for the delayed register merge. Stores
//! produce the merged memory word.

/// Bits per byte.
const BYTE_BITS: u32 = 8;

/// Number of preserved bits when the addressed byte must become the highest.
#[inline]
const fn left_preserved(addr: u32) -> u32 {
    (3 - (addr & 3)) * BYTE_BITS
}

/// Number of preserved bits when the addressed byte must become the lowest.
#[inline]
const fn right_preserved(addr: u32) -> u32 {
    (addr & 3) * BYTE_BITS
}

/// Returns `addr` rounded down to a word boundary.
#[inline]
pub const fn word_base(addr: u32) -> u32 {
    addr & !3
}

/// Load word left: shifts `word` left so the addressed byte is highest.
///
/// # Returns
///
/// `(value, mask)`; register bits where `mask` is 0 are preserved.
pub const fn lwl(word: u32, addr: u32) -> (u32, u32) {
    let preserved = left_preserved(addr);
    (word << preserved, u32::MAX << preserved)
}

/// Load word right: shifts `word` right so the addressed byte is lowest.
///
/// # Returns
///
/// `(value, mask)`; register bits where `mask` is 0 are preserved.
pub const fn lwr(word: u32, addr: u32) -> (u32, u32) {
    let preserved = right_preserved(addr);
    (word >> preserved, u32::MAX >> preserved)
}

/// Store word left: moves the highest bytes of `reg` into the addressed position.
///
/// # Returns
///
/// The memory word to write back at [`word_base`]`(addr)`.
pub const fn swl(mem: u32, reg: u32, addr: u32) -> u32 {
    let preserved = left_preserved(addr);
    let mask = u32::MAX >> preserved;
    ((reg >> preserved) & mask) | (mem & !mask)
}

/// Store word right: moves the lowest bytes of `reg` into the addressed position.
///
/// # Returns
///
/// The memory word to write back at [`word_base`]`(addr)`.
pub const fn swr(mem: u32, reg: u32, addr: u32) -> u32 {
    let preserved = right_preserved(addr);
    let mask = u32::MAX << preserved;
    ((reg << preserved) & mask) | (mem & !mask)
}

/// Merges a delayed load into a register value.
///
/// Bits set in `mask` come from `value`; the others keep `current`.
pub const fn merge(current: u32, value: u32, mask: u32) -> u32 {
    (current & !mask) | (value & mask)
}
