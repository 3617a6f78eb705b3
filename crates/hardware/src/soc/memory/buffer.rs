//! RAM Buffer Implementation.
//!
//! This module provides the raw byte storage behind physical memory. It is a plain
//! heap allocation partitioned into fixed-size frames; frame ownership is tracked
//! elsewhere, by whichever page currently claims the frame.

use std::ops::Range;

use crate::common::constants::PAGE_SIZE;

/// Zero-initialized byte storage for a fixed number of page frames.
#[derive(Clone)]
pub struct FrameBuffer {
    bytes: Vec<u8>,
    frames: usize,
}

impl FrameBuffer {
    /// Creates a zeroed buffer of `frames` frames.
    ///
    /// # Arguments
    ///
    /// * `frames` - Number of page frames.
    pub fn new(frames: usize) -> Self {
        Self {
            bytes: vec![0; frames * PAGE_SIZE as usize],
            frames,
        }
    }

    /// Returns the size of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the number of frames.
    pub const fn frames(&self) -> usize {
        self.frames
    }

    /// Byte range covered by frame `ppn`.
    fn frame_range(ppn: usize) -> Range<usize> {
        let start = ppn * PAGE_SIZE as usize;
        start..start + PAGE_SIZE as usize
    }

    /// Reads a slice of memory.
    ///
    /// # Panics
    ///
    /// Panics if the range lies outside the buffer.
    pub fn read_slice(&self, offset: usize, len: usize) -> &[u8] {
        &self.bytes[offset..offset + len]
    }

    /// Writes a slice of memory.
    ///
    /// # Panics
    ///
    /// Panics if the range lies outside the buffer.
    pub fn write_slice(&mut self, offset: usize, data: &[u8]) {
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
    }

    /// Returns the bytes of frame `ppn`, or `None` if it does not exist.
    pub fn frame(&self, ppn: usize) -> Option<&[u8]> {
        self.bytes.get(Self::frame_range(ppn))
    }

    /// Returns the bytes of frame `ppn` mutably, or `None` if it does not exist.
    pub fn frame_mut(&mut self, ppn: usize) -> Option<&mut [u8]> {
        self.bytes.get_mut(Self::frame_range(ppn))
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("frames", &self.frames)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
