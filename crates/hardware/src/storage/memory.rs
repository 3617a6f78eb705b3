//! In-memory backing store.

use std::collections::HashMap;

use super::{BackingStore, FileId, StorageError, alloc_slot};

#[derive(Debug)]
struct OpenFile {
    name: String,
    pos: usize,
}

/// A backing store whose files live in a map from name to contents.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: HashMap<String, Vec<u8>>,
    open: Vec<Option<OpenFile>>,
}

impl MemoryFileSystem {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the contents of a file, if it exists.
    pub fn contents(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }

    /// Returns `true` if a file with this name exists.
    pub fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Returns the number of open handles.
    pub fn open_files(&self) -> usize {
        self.open.iter().flatten().count()
    }

    fn handle(&mut self, fid: FileId) -> Result<&mut OpenFile, StorageError> {
        self.open
            .get_mut(fid)
            .and_then(Option::as_mut)
            .ok_or(StorageError::BadFileId(fid))
    }
}

impl BackingStore for MemoryFileSystem {
    fn open(&mut self, name: &str) -> Result<FileId, StorageError> {
        if !self.files.contains_key(name) {
            return Err(StorageError::NotFound(name.to_owned()));
        }
        let file = OpenFile {
            name: name.to_owned(),
            pos: 0,
        };
        Ok(alloc_slot(&mut self.open, file))
    }

    fn create(&mut self, name: &str) -> Result<FileId, StorageError> {
        if name.is_empty() {
            return Err(StorageError::InvalidName(name.to_owned()));
        }
        let _ = self.files.insert(name.to_owned(), Vec::new());
        self.open(name)
    }

    fn close(&mut self, fid: FileId) -> Result<(), StorageError> {
        self.open
            .get_mut(fid)
            .and_then(Option::take)
            .map(|_| ())
            .ok_or(StorageError::BadFileId(fid))
    }

    fn seek(&mut self, fid: FileId, position: u64) -> Result<(), StorageError> {
        self.handle(fid)?.pos = position as usize;
        Ok(())
    }

    fn read(&mut self, fid: FileId, buf: &mut [u8]) -> Result<usize, StorageError> {
        let (name, pos) = {
            let h = self.handle(fid)?;
            (h.name.clone(), h.pos)
        };
        let data = self
            .files
            .get(&name)
            .ok_or_else(|| StorageError::NotFound(name.clone()))?;
        let end = data.len().min(pos + buf.len());
        let n = end.saturating_sub(pos);
        buf[..n].copy_from_slice(&data[pos.min(end)..end]);
        self.handle(fid)?.pos = pos + n;
        Ok(n)
    }

    fn write(&mut self, fid: FileId, buf: &[u8]) -> Result<usize, StorageError> {
        let (name, pos) = {
            let h = self.handle(fid)?;
            (h.name.clone(), h.pos)
        };
        let data = self
            .files
            .get_mut(&name)
            .ok_or_else(|| StorageError::NotFound(name.clone()))?;
        let end = pos + buf.len();
        if data.len() < end {
            data.resize(end, 0);
        }
        data[pos..end].copy_from_slice(buf);
        self.handle(fid)?.pos = end;
        Ok(buf.len())
    }

    fn unlink(&mut self, name: &str) -> Result<(), StorageError> {
        self.files
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(name.to_owned()))
    }
}
