//! Physical and Virtual Address types.
//!
//! This module defines strong types for physical and virtual addresses to prevent
//! accidental mixing of address spaces. It provides the following:
//! 1. **Type Safety:** Distinguishes between virtual and physical address spaces at compile time.
//! 2. **Address Decomposition:** Page number and offset extraction for the fixed page size.
//! 3. **Address Composition:** Rebuilding an address from a page number and an offset.

use super::constants::{PAGE_OFFSET_MASK, PAGE_SHIFT};

/// A 32-bit virtual address as issued by a user program.
///
/// Virtual addresses must pass through the address translator before they can
/// index physical memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtAddr(pub u32);

/// A physical byte offset into the simulated RAM.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysAddr(pub u32);

impl VirtAddr {
    /// Creates a new virtual address from a raw 32-bit value.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Builds a virtual address from a virtual page number and an in-page offset.
    ///
    /// # Arguments
    ///
    /// * `vpn` - The virtual page number.
    /// * `offset` - Byte offset within the page; must be smaller than the page size.
    #[inline]
    pub const fn from_parts(vpn: usize, offset: u32) -> Self {
        Self(((vpn as u32) << PAGE_SHIFT) | (offset & PAGE_OFFSET_MASK))
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u32 {
        self.0
    }

    /// Returns the virtual page number this address falls in.
    #[inline(always)]
    pub const fn vpn(self) -> usize {
        (self.0 >> PAGE_SHIFT) as usize
    }

    /// Extracts the byte offset within the page.
    #[inline(always)]
    pub const fn page_offset(self) -> u32 {
        self.0 & PAGE_OFFSET_MASK
    }

    /// Returns `true` if the address is a multiple of `size`.
    ///
    /// # Arguments
    ///
    /// * `size` - Access width in bytes (1, 2, or 4).
    #[inline(always)]
    pub const fn is_aligned(self, size: u32) -> bool {
        self.0 & (size - 1) == 0
    }
}

impl PhysAddr {
    /// Creates a new physical address from a raw value.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Builds a physical address from a frame number and an in-frame offset.
    #[inline]
    pub const fn from_parts(ppn: usize, offset: u32) -> Self {
        Self(((ppn as u32) << PAGE_SHIFT) | (offset & PAGE_OFFSET_MASK))
    }

    /// Returns the raw address value.
    #[inline(always)]
    pub const fn val(self) -> u32 {
        self.0
    }

    /// Returns the address as a `usize` index into the RAM buffer.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the physical frame number this address falls in.
    #[inline(always)]
    pub const fn ppn(self) -> usize {
        (self.0 >> PAGE_SHIFT) as usize
    }
}

impl From<u32> for VirtAddr {
    fn from(addr: u32) -> Self {
        Self(addr)
    }
}

impl From<i32> for VirtAddr {
    fn from(addr: i32) -> Self {
        Self(addr as u32)
    }
}
