//! Swap space.
//!
//! Each process owns one swap file named `"<pid>_<name>"`. Page `vpn` of the
//! process lives at byte offset `vpn * PAGE_SIZE` in that file, so pages can be
//! saved and loaded in any order.

use tracing::trace;

use super::{BackingStore, FileId, StorageError};
use crate::common::constants::PAGE_SIZE;
use crate::common::Pid;
use crate::core::units::mmu::page::Page;

/// Per-process page persistence over a [`BackingStore`].
#[derive(Debug)]
pub struct SwapSpace {
    store: Box<dyn BackingStore>,
}

impl SwapSpace {
    /// Creates swap space on top of `store`.
    pub fn new(store: Box<dyn BackingStore>) -> Self {
        Self { store }
    }

    /// Returns the swap file name for a process.
    pub fn file_name(pid: Pid, name: &str) -> String {
        format!("{pid}_{name}")
    }

    /// Returns the underlying store.
    pub fn store_mut(&mut self) -> &mut dyn BackingStore {
        self.store.as_mut()
    }

    /// Writes the private buffer of `page` to its slot in the owner's swap file.
    ///
    /// The file is created on first use. Does not touch the page's flags.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the owning process.
    /// * `page` - Page whose buffer is written.
    pub fn save(&mut self, name: &str, page: &Page) -> Result<(), StorageError> {
        let file = Self::file_name(page.pid, name);
        let fid = match self.store.open(&file) {
            Ok(fid) => fid,
            Err(StorageError::NotFound(_)) => self.store.create(&file)?,
            Err(e) => return Err(e),
        };
        trace!(file = %file, vpn = page.vpn, "swap out");
        let written = self.transfer(fid, page.vpn, |store, fid| store.write(fid, &page.data));
        self.store.close(fid)?;
        check_len(written?)
    }

    /// Reads the slot of `page` from the owner's swap file into its private buffer.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the owning process.
    /// * `page` - Page whose buffer is filled.
    ///
    /// # Returns
    ///
    /// [`StorageError::ShortTransfer`] if the slot was never written in full.
    pub fn load(&mut self, name: &str, page: &mut Page) -> Result<(), StorageError> {
        let file = Self::file_name(page.pid, name);
        let fid = self.store.open(&file)?;
        trace!(file = %file, vpn = page.vpn, "swap in");
        let data = &mut page.data;
        let read = self.transfer(fid, page.vpn, |store, fid| store.read(fid, data));
        self.store.close(fid)?;
        check_len(read?)
    }

    /// Removes a process's swap file. A missing file is not an error.
    pub fn discard(&mut self, pid: Pid, name: &str) -> Result<(), StorageError> {
        match self.store.unlink(&Self::file_name(pid, name)) {
            Ok(()) | Err(StorageError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn transfer<F>(&mut self, fid: FileId, vpn: usize, op: F) -> Result<usize, StorageError>
    where
        F: FnOnce(&mut dyn BackingStore, FileId) -> Result<usize, StorageError>,
    {
        self.store.seek(fid, vpn as u64 * u64::from(PAGE_SIZE))?;
        op(self.store.as_mut(), fid)
    }
}

fn check_len(actual: usize) -> Result<(), StorageError> {
    let expected = PAGE_SIZE as usize;
    if actual == expected {
        Ok(())
    } else {
        Err(StorageError::ShortTransfer { expected, actual })
    }
}
