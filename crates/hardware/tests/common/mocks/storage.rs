use mipsim_core::storage::{BackingStore, FileId, StorageError};
use mockall::mock;

mock! {
    /// Backing store whose every call is scripted by the test.
    pub Store {}

    impl BackingStore for Store {
        fn open(&mut self, name: &str) -> Result<FileId, StorageError>;
        fn create(&mut self, name: &str) -> Result<FileId, StorageError>;
        fn close(&mut self, fid: FileId) -> Result<(), StorageError>;
        fn seek(&mut self, fid: FileId, position: u64) -> Result<(), StorageError>;
        fn read(&mut self, fid: FileId, buf: &mut [u8]) -> Result<usize, StorageError>;
        fn write(&mut self, fid: FileId, buf: &[u8]) -> Result<usize, StorageError>;
        fn unlink(&mut self, name: &str) -> Result<(), StorageError>;
    }
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore").finish_non_exhaustive()
    }
}
