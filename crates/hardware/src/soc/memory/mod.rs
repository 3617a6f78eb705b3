//! Physical System Memory.
//!
//! This module implements the simulated RAM. It provides:
//! 1. **Buffer:** Backing storage (`FrameBuffer`) for RAM contents.
//! 2. **Memory:** Little-endian sized access at physical addresses.
//! 3. **Frame Access:** Whole-frame views used by the page fault handler, which
//!    moves pages between RAM and swap without going through address translation.

/// Frame-partitioned byte storage.
pub mod buffer;

use self::buffer::FrameBuffer;
use crate::common::addr::PhysAddr;

/// Simulated physical RAM of `frames × PAGE_SIZE` bytes.
#[derive(Clone, Debug)]
pub struct PhysicalMemory {
    buffer: FrameBuffer,
}

impl PhysicalMemory {
    /// Creates zeroed physical memory with `frames` page frames.
    pub fn new(frames: usize) -> Self {
        Self {
            buffer: FrameBuffer::new(frames),
        }
    }

    /// Returns the number of page frames.
    pub const fn num_frames(&self) -> usize {
        self.buffer.frames()
    }

    /// Returns the size of memory in bytes.
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Reads `size` bytes at `paddr` as a little-endian value.
    ///
    /// Byte and half-word reads are zero-extended.
    ///
    /// # Arguments
    ///
    /// * `paddr` - Physical address, already translated and bounds-checked.
    /// * `size` - Access width in bytes (1, 2, or 4).
    ///
    /// # Panics
    ///
    /// Panics if the access lies outside physical memory.
    pub fn read(&self, paddr: PhysAddr, size: u32) -> u32 {
        let b = self.buffer.read_slice(paddr.index(), size as usize);
        match size {
            1 => u32::from(b[0]),
            2 => u32::from(u16::from_le_bytes([b[0], b[1]])),
            _ => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        }
    }

    /// Writes the low `size` bytes of `value` at `paddr` in little-endian order.
    ///
    /// # Arguments
    ///
    /// * `paddr` - Physical address, already translated and bounds-checked.
    /// * `size` - Access width in bytes (1, 2, or 4).
    /// * `value` - Value to store; higher bytes are discarded.
    ///
    /// # Panics
    ///
    /// Panics if the access lies outside physical memory.
    pub fn write(&mut self, paddr: PhysAddr, size: u32, value: u32) {
        let bytes = value.to_le_bytes();
        self.buffer
            .write_slice(paddr.index(), &bytes[..size as usize]);
    }

    /// Returns frame `ppn`, or `None` if it is out of range.
    pub fn frame(&self, ppn: usize) -> Option<&[u8]> {
        self.buffer.frame(ppn)
    }

    /// Returns frame `ppn` mutably, or `None` if it is out of range.
    pub fn frame_mut(&mut self, ppn: usize) -> Option<&mut [u8]> {
        self.buffer.frame_mut(ppn)
    }

    /// Fills frame `ppn` with zeroes. Out-of-range frames are ignored.
    pub fn zero_frame(&mut self, ppn: usize) {
        if let Some(frame) = self.buffer.frame_mut(ppn) {
            frame.fill(0);
        }
    }

    /// Copies `data` into memory at physical address `paddr`.
    ///
    /// Used to place images when virtual memory is disabled.
    ///
    /// # Panics
    ///
    /// Panics if the range lies outside physical memory.
    pub fn load(&mut self, paddr: PhysAddr, data: &[u8]) {
        self.buffer.write_slice(paddr.index(), data);
    }
}
