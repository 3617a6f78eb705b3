//! First-Fit Frame Allocation.
//!
//! Hands out the lowest free frame and never evicts. Once all frames are
//! taken, further page-ins fail with `OutOfMemory` until a process exits.
//! Suited to small configurations where every process fits in memory.

use super::{FrameTable, PageDirectory, PageReplacement, Replacement};
use crate::common::Pid;
use crate::core::units::mmu::page::PageKey;
use crate::kernel::KernelError;

/// First-fit policy state.
#[derive(Debug)]
pub struct FirstFit {
    frames: FrameTable,
}

impl FirstFit {
    /// Creates a policy over `frames` physical frames.
    pub fn new(frames: usize) -> Self {
        Self {
            frames: FrameTable::new(frames),
        }
    }
}

impl PageReplacement for FirstFit {
    fn replace(
        &mut self,
        incoming: PageKey,
        _pages: &mut dyn PageDirectory,
    ) -> Result<Replacement, KernelError> {
        let frame = self
            .frames
            .claim_free(incoming)
            .ok_or(KernelError::OutOfMemory)?;
        Ok(Replacement {
            frame,
            evicted: None,
        })
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
        false
    }
}
