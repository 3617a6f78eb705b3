//! Pass-through backing store over a host directory.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::{BackingStore, FileId, StorageError, alloc_slot};

/// A backing store whose files are plain files in one host directory.
#[derive(Debug)]
pub struct HostFileSystem {
    root: PathBuf,
    open: Vec<Option<File>>,
}

impl HostFileSystem {
    /// Creates a store rooted at `root`, creating the directory if needed.
    ///
    /// # Arguments
    ///
    /// * `root` - Host directory holding the store's files.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            open: Vec::new(),
        })
    }

    /// Returns the host directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a store file name to a host path inside the root.
    fn path(&self, name: &str) -> Result<PathBuf, StorageError> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0']);
        if valid {
            Ok(self.root.join(name))
        } else {
            Err(StorageError::InvalidName(name.to_owned()))
        }
    }

    fn file(&mut self, fid: FileId) -> Result<&mut File, StorageError> {
        self.open
            .get_mut(fid)
            .and_then(Option::as_mut)
            .ok_or(StorageError::BadFileId(fid))
    }
}

/// Maps a host "not found" error to [`StorageError::NotFound`].
fn not_found(name: &str) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |e| {
        if e.kind() == io::ErrorKind::NotFound {
            StorageError::NotFound(name.to_owned())
        } else {
            StorageError::Io(e)
        }
    }
}

impl BackingStore for HostFileSystem {
    fn open(&mut self, name: &str) -> Result<FileId, StorageError> {
        let path = self.path(name)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(not_found(name))?;
        Ok(alloc_slot(&mut self.open, file))
    }

    fn create(&mut self, name: &str) -> Result<FileId, StorageError> {
        let path = self.path(name)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(alloc_slot(&mut self.open, file))
    }

    fn close(&mut self, fid: FileId) -> Result<(), StorageError> {
        self.open
            .get_mut(fid)
            .and_then(Option::take)
            .map(drop)
            .ok_or(StorageError::BadFileId(fid))
    }

    fn seek(&mut self, fid: FileId, position: u64) -> Result<(), StorageError> {
        let _ = self.file(fid)?.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    fn read(&mut self, fid: FileId, buf: &mut [u8]) -> Result<usize, StorageError> {
        let file = self.file(fid)?;
        let mut total = 0;
        while total < buf.len() {
            match file.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(total)
    }

    fn write(&mut self, fid: FileId, buf: &[u8]) -> Result<usize, StorageError> {
        self.file(fid)?.write_all(buf)?;
        Ok(buf.len())
    }

    fn unlink(&mut self, name: &str) -> Result<(), StorageError> {
        let path = self.path(name)?;
        fs::remove_file(path).map_err(not_found(name))
    }
}
