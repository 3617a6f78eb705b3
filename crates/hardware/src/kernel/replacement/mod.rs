//! Page Replacement Policies.
//!
//! Choose the physical frame for a page being brought in and, when every frame
//! is taken, which resident page gives up its frame. Policies only decide: the
//! fault handler moves the bytes and updates the evicted page.
//!
//! # Policies
//!
//! - `Clock`: Second-chance replacement over a rotating hand.
//! - `FirstFit`: Lowest free frame, never evicts.

/// Clock (second-chance) replacement.
pub mod clock;

/// First-available-frame allocation.
pub mod first_fit;

pub use clock::Clock;
pub use first_fit::FirstFit;

use crate::common::Pid;
use crate::config::ReplacementKind;
use crate::core::units::mmu::page::{Page, PageKey};

use super::KernelError;

/// Access to pages of any process by key.
///
/// Policies read and clear `used` bits through this view.
pub trait PageDirectory {
    /// Returns the page named by `key`, if it exists.
    fn page_mut(&mut self, key: PageKey) -> Option<&mut Page>;
}

/// Outcome of a replacement decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Replacement {
    /// Frame assigned to the incoming page.
    pub frame: usize,
    /// Page that held the frame and must be evicted.
    pub evicted: Option<PageKey>,
}

/// Trait for page replacement policies.
pub trait PageReplacement: Send + std::fmt::Debug {
    /// Assigns a frame to `incoming`.
    ///
    /// # Arguments
    ///
    /// * `incoming` - The page being made resident.
    /// * `pages` - View used to inspect and age resident pages.
    ///
    /// # Returns
    ///
    /// The chosen frame and the page evicted from it, or
    /// [`KernelError::OutOfMemory`] if the policy cannot find a frame.
    fn replace(
        &mut self,
        incoming: PageKey,
        pages: &mut dyn PageDirectory,
    ) -> Result<Replacement, KernelError>;

    /// Releases every frame held by pages of `pid`.
    ///
    /// # Returns
    ///
    /// The number of frames released.
    fn remove_process(&mut self, pid: Pid) -> usize;

    /// Frees `frame` without evicting anything, undoing a failed page-in.
    fn release(&mut self, frame: usize);

    /// Returns the page occupying `frame`.
    fn owner(&self, frame: usize) -> Option<PageKey>;

    /// Returns the number of unoccupied frames.
    fn free_frames(&self) -> usize;

    /// Returns `true` if the policy evicts resident pages when memory is full.
    fn evicts(&self) -> bool;
}

/// Builds the policy selected by `kind` over `frames` physical frames.
pub fn build(kind: ReplacementKind, frames: usize) -> Box<dyn PageReplacement> {
    match kind {
        ReplacementKind::Clock => Box::new(Clock::new(frames)),
        ReplacementKind::FirstFit => Box::new(FirstFit::new(frames)),
    }
}

/// Frame ownership table shared by the policies.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FrameTable {
    owners: Vec<Option<PageKey>>,
}

impl FrameTable {
    fn new(frames: usize) -> Self {
        Self {
            owners: vec![None; frames],
        }
    }

    fn len(&self) -> usize {
        self.owners.len()
    }

    /// Claims the lowest free frame for `key`.
    fn claim_free(&mut self, key: PageKey) -> Option<usize> {
        let frame = self.owners.iter().position(Option::is_none)?;
        self.owners[frame] = Some(key);
        Some(frame)
    }

    fn get(&self, frame: usize) -> Option<PageKey> {
        self.owners.get(frame).copied().flatten()
    }

    fn set(&mut self, frame: usize, key: PageKey) {
        self.owners[frame] = Some(key);
    }

    fn clear(&mut self, frame: usize) {
        if let Some(slot) = self.owners.get_mut(frame) {
            *slot = None;
        }
    }

    fn release_pid(&mut self, pid: Pid) -> usize {
        let mut released = 0;
        for slot in &mut self.owners {
            if slot.is_some_and(|k| k.pid == pid) {
                *slot = None;
                released += 1;
            }
        }
        released
    }

    fn free(&self) -> usize {
        self.owners.iter().filter(|o| o.is_none()).count()
    }
}
