//! Pages and page tables.
//!
//! A `Page` is the metadata for one virtual page of one process, together with
//! a private buffer holding the page's contents while it is not resident. A
//! `PageTable` maps the dense virtual page numbers of one address space to
//! lazily created pages.

use crate::common::Pid;
use crate::common::constants::PAGE_SIZE;

/// Globally unique name of a virtual page: its owner and its page number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageKey {
    /// Owning process.
    pub pid: Pid,
    /// Virtual page number within the owner's address space.
    pub vpn: usize,
}

impl PageKey {
    /// Creates a key for page `vpn` of process `pid`.
    pub const fn new(pid: Pid, vpn: usize) -> Self {
        Self { pid, vpn }
    }
}

/// Per-virtual-page metadata and backing buffer.
///
/// `present` implies `ppn` names a frame no other present page claims.
#[derive(Clone, PartialEq, Eq)]
pub struct Page {
    /// Virtual page number.
    pub vpn: usize,
    /// Physical frame holding the page, if resident.
    pub ppn: Option<usize>,
    /// The page is resident in `ppn`.
    pub present: bool,
    /// Stores to the page raise a read-only exception.
    pub read_only: bool,
    /// Set by translation on every access; cleared by clock replacement.
    pub used: bool,
    /// Set by translation on every write since the page became resident.
    pub dirty: bool,
    /// A backing-store copy has been written at least once.
    pub saved: bool,
    /// Owning process.
    pub pid: Pid,
    /// Page contents while swapped out. Exactly one frame long.
    pub data: Box<[u8]>,
}

impl Page {
    /// Creates a non-resident, never-saved, zero-filled page.
    pub fn new(pid: Pid, vpn: usize, read_only: bool) -> Self {
        Self {
            vpn,
            ppn: None,
            present: false,
            read_only,
            used: false,
            dirty: false,
            saved: false,
            pid,
            data: vec![0; PAGE_SIZE as usize].into_boxed_slice(),
        }
    }

    /// Returns the key naming this page.
    pub const fn key(&self) -> PageKey {
        PageKey::new(self.pid, self.vpn)
    }

    /// Returns `true` if the frame contents must be written back before reuse.
    pub const fn needs_save(&self) -> bool {
        self.dirty || !self.saved
    }

    /// Makes the page resident in frame `ppn` with clean, unused status.
    pub fn map(&mut self, ppn: usize) {
        self.ppn = Some(ppn);
        self.present = true;
        self.dirty = false;
        self.used = false;
    }

    /// Marks the page as no longer resident.
    pub fn unmap(&mut self) {
        self.ppn = None;
        self.present = false;
        self.dirty = false;
        self.used = false;
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("pid", &self.pid)
            .field("vpn", &self.vpn)
            .field("ppn", &self.ppn)
            .field("present", &self.present)
            .field("read_only", &self.read_only)
            .field("used", &self.used)
            .field("dirty", &self.dirty)
            .field("saved", &self.saved)
            .finish_non_exhaustive()
    }
}

/// One address space: a dense map from virtual page number to optional page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageTable {
    entries: Vec<Option<Page>>,
}

impl PageTable {
    /// Creates an empty table spanning `num_pages` virtual pages.
    pub fn new(num_pages: usize) -> Self {
        Self {
            entries: (0..num_pages).map(|_| None).collect(),
        }
    }

    /// Returns the number of virtual pages the table spans.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table spans no pages.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns page `vpn`, if it exists.
    pub fn get(&self, vpn: usize) -> Option<&Page> {
        self.entries.get(vpn).and_then(Option::as_ref)
    }

    /// Returns page `vpn` mutably, if it exists.
    pub fn get_mut(&mut self, vpn: usize) -> Option<&mut Page> {
        self.entries.get_mut(vpn).and_then(Option::as_mut)
    }

    /// Stores `page` at its virtual page number, returning the page it replaced.
    ///
    /// # Returns
    ///
    /// `Err(page)` if the page number lies outside the table.
    pub fn insert(&mut self, page: Page) -> Result<Option<Page>, Page> {
        match self.entries.get_mut(page.vpn) {
            Some(slot) => Ok(slot.replace(page)),
            None => Err(page),
        }
    }

    /// Returns page `vpn`, creating a writable, never-saved page for `pid` if absent.
    ///
    /// # Returns
    ///
    /// `None` if `vpn` lies outside the table.
    pub fn get_or_create(&mut self, pid: Pid, vpn: usize) -> Option<&mut Page> {
        self.entries
            .get_mut(vpn)
            .map(|slot| slot.get_or_insert_with(|| Page::new(pid, vpn, false)))
    }

    /// Iterates over every existing page.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.entries.iter().flatten()
    }

    /// Iterates mutably over every existing page.
    pub fn pages_mut(&mut self) -> impl Iterator<Item = &mut Page> {
        self.entries.iter_mut().flatten()
    }

    /// Iterates over the pages currently resident in physical memory.
    pub fn resident(&self) -> impl Iterator<Item = &Page> {
        self.pages().filter(|p| p.present)
    }
}
