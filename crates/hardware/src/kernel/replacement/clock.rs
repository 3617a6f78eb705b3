//! Clock (Second-Chance) Replacement.
//!
//! Free frames are claimed lowest first. When none is free, a hand sweeps the
//! frames in order: a page whose `used` bit is set has the bit cleared and is
//! passed over; the first page found with `used` clear is evicted, and the hand
//! stops just past its frame.
//!
//! # Performance
//!
//! - **Time Complexity:** `replace()` is O(F) where F is the frame count; at most
//!   two sweeps are needed since the first clears every bit.
//! - **Space Complexity:** O(F).

use super::{FrameTable, PageDirectory, PageReplacement, Replacement};
use crate::common::Pid;
use crate::core::units::mmu::page::PageKey;
use crate::kernel::KernelError;

/// Clock policy state.
#[derive(Debug)]
pub struct Clock {
    frames: FrameTable,
    hand: usize,
}

impl Clock {
    /// Creates a policy over `frames` physical frames with the hand at frame 0.
    pub fn new(frames: usize) -> Self {
        Self {
            frames: FrameTable::new(frames),
            hand: 0,
        }
    }

    /// Returns the frame the next sweep starts at.
    pub const fn hand(&self) -> usize {
        self.hand
    }
}

impl PageReplacement for Clock {
    fn replace(
        &mut self,
        incoming: PageKey,
        pages: &mut dyn PageDirectory,
    ) -> Result<Replacement, KernelError> {
        if let Some(frame) = self.frames.claim_free(incoming) {
            return Ok(Replacement {
                frame,
                evicted: None,
            });
        }

        let n = self.frames.len();
        if n == 0 {
            return Err(KernelError::OutOfMemory);
        }

        for _ in 0..2 * n {
            let frame = self.hand;
            self.hand = (self.hand + 1) % n;

            let Some(owner) = self.frames.get(frame) else {
                continue;
            };
            let page = pages
                .page_mut(owner)
                .ok_or(KernelError::InvalidPage(owner))?;
            if page.used {
                page.used = false;
                continue;
            }

            self.frames.set(frame, incoming);
            return Ok(Replacement {
                frame,
                evicted: Some(owner),
            });
        }

        Err(KernelError::OutOfMemory)
    }

    fn remove_process(&mut self, pid: Pid) -> usize {
        self.frames.release_pid(pid)
    }

    fn release(&mut self, frame: usize) {
        self.frames.clear(frame);
    }

    fn owner(&self, frame: usize) -> Option<PageKey> {
        self.frames.get(frame)
    }

    fn free_frames(&self) -> usize {
        self.frames.free()
    }

    fn evicts(&self) -> bool {
        true
    }
}
