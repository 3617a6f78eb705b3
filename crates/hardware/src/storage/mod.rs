//! Backing Store.
//!
//! This module defines the file-level storage that holds swapped-out pages. It provides:
//! 1. **Interface:** The `BackingStore` trait, a small open/seek/read/write file API.
//! 2. **In-Memory Store:** `MemoryFileSystem`, for tests and diskless runs.
//! 3. **Host Store:** `HostFileSystem`, passing files through to a host directory.
//! 4. **Swap:** `SwapSpace`, which maps each process's pages onto one swap file.
//!
//! Stores are byte-addressed. A read whose range ends exactly at end-of-file is
//! complete; a read that extends past end-of-file returns the short count; a write
//! past end-of-file extends the file, zero-filling any gap.

/// Pass-through store backed by a host directory.
pub mod host;

/// Store held entirely in memory.
pub mod memory;

/// Per-process swap files.
pub mod swap;

use std::io;

use thiserror::Error;

pub use host::HostFileSystem;
pub use memory::MemoryFileSystem;
pub use swap::SwapSpace;

/// Handle to an open file.
pub type FileId = usize;

/// Errors raised by backing stores.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No file has this name.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The handle does not name an open file.
    #[error("bad file id {0}")]
    BadFileId(FileId),

    /// The name cannot be used as a file name.
    #[error("invalid file name {0:?}")]
    InvalidName(String),

    /// Fewer bytes than a whole page were transferred.
    #[error("short transfer: expected {expected} bytes, got {actual}")]
    ShortTransfer {
        /// Bytes requested.
        expected: usize,
        /// Bytes transferred.
        actual: usize,
    },

    /// The host file system failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// File-level storage used for swap.
///
/// The syscall layer encodes failures as `-1`; at this level they are
/// [`StorageError`]s.
pub trait BackingStore: Send + std::fmt::Debug {
    /// Opens an existing file, positioned at its start.
    fn open(&mut self, name: &str) -> Result<FileId, StorageError>;

    /// Creates an empty file, truncating any existing one, and opens it.
    fn create(&mut self, name: &str) -> Result<FileId, StorageError>;

    /// Closes an open file.
    fn close(&mut self, fid: FileId) -> Result<(), StorageError>;

    /// Moves the position of an open file to byte `position`.
    fn seek(&mut self, fid: FileId, position: u64) -> Result<(), StorageError>;

    /// Reads up to `buf.len()` bytes at the current position and advances it.
    ///
    /// # Returns
    ///
    /// The number of bytes read; less than `buf.len()` only at end-of-file.
    fn read(&mut self, fid: FileId, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Writes `buf` at the current position and advances it.
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    fn write(&mut self, fid: FileId, buf: &[u8]) -> Result<usize, StorageError>;

    /// Removes a file by name.
    fn unlink(&mut self, name: &str) -> Result<(), StorageError>;
}

impl<T: BackingStore + ?Sized> BackingStore for Box<T> {
    fn open(&mut self, name: &str) -> Result<FileId, StorageError> {
        (**self).open(name)
    }

    fn create(&mut self, name: &str) -> Result<FileId, StorageError> {
        (**self).create(name)
    }

    fn close(&mut self, fid: FileId) -> Result<(), StorageError> {
        (**self).close(fid)
    }

    fn seek(&mut self, fid: FileId, position: u64) -> Result<(), StorageError> {
        (**self).seek(fid, position)
    }

    fn read(&mut self, fid: FileId, buf: &mut [u8]) -> Result<usize, StorageError> {
        (**self).read(fid, buf)
    }

    fn write(&mut self, fid: FileId, buf: &[u8]) -> Result<usize, StorageError> {
        (**self).write(fid, buf)
    }

    fn unlink(&mut self, name: &str) -> Result<(), StorageError> {
        (**self).unlink(name)
    }
}

/// Lowest free slot in an arena of optional entries, growing it if full.
fn alloc_slot<T>(slots: &mut Vec<Option<T>>, value: T) -> usize {
    match slots.iter().position(Option::is_none) {
        Some(idx) => {
            slots[idx] = Some(value);
            idx
        }
        None => {
            slots.push(Some(value));
            slots.len() - 1
        }
    }
}
