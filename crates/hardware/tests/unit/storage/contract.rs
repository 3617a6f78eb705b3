//! Backing Store Contract.
//!
//! Every store must pass these checks; they are run against the in-memory
//! store here and against the host store in `host`.

use mipsim_core::storage::{BackingStore, MemoryFileSystem, StorageError};
use pretty_assertions::assert_eq;

pub fn reads_back_what_was_written(store: &mut dyn BackingStore) {
    let fid = store.create("f").unwrap();
    assert_eq!(store.write(fid, b"hello world").unwrap(), 11);
    store.seek(fid, 6).unwrap();
    let mut buf = [0u8; 5];
    assert_eq!(store.read(fid, &mut buf).unwrap(), 5);
    assert_eq!(&buf, b"world");
    store.close(fid).unwrap();
}

pub fn read_at_end_of_file_is_short(store: &mut dyn BackingStore) {
    let fid = store.create("f").unwrap();
    let _ = store.write(fid, &[7; 8]).unwrap();
    store.seek(fid, 4).unwrap();
    let mut buf = [0u8; 8];
    assert_eq!(store.read(fid, &mut buf).unwrap(), 4);
    store.seek(fid, 8).unwrap();
    assert_eq!(store.read(fid, &mut buf).unwrap(), 0);
    store.close(fid).unwrap();
}

pub fn write_past_end_zero_fills_the_gap(store: &mut dyn BackingStore) {
    let fid = store.create("f").unwrap();
    store.seek(fid, 4).unwrap();
    let _ = store.write(fid, &[9, 9]).unwrap();
    store.seek(fid, 0).unwrap();
    let mut buf = [0xFFu8; 6];
    assert_eq!(store.read(fid, &mut buf).unwrap(), 6);
    assert_eq!(buf, [0, 0, 0, 0, 9, 9]);
    store.close(fid).unwrap();
}

pub fn create_truncates(store: &mut dyn BackingStore) {
    let fid = store.create("f").unwrap();
    let _ = store.write(fid, b"old contents").unwrap();
    store.close(fid).unwrap();

    let fid = store.create("f").unwrap();
    let mut buf = [0u8; 4];
    assert_eq!(store.read(fid, &mut buf).unwrap(), 0);
    store.close(fid).unwrap();
}

pub fn missing_files_and_handles_are_errors(store: &mut dyn BackingStore) {
    assert!(matches!(store.open("nope"), Err(StorageError::NotFound(_))));
    assert!(matches!(store.unlink("nope"), Err(StorageError::NotFound(_))));
    assert!(matches!(store.close(99), Err(StorageError::BadFileId(99))));
    assert!(matches!(store.seek(99, 0), Err(StorageError::BadFileId(99))));
    assert!(matches!(store.create(""), Err(StorageError::InvalidName(_))));

    let fid = store.create("f").unwrap();
    store.close(fid).unwrap();
    assert!(matches!(store.close(fid), Err(StorageError::BadFileId(_))));
    store.unlink("f").unwrap();
    assert!(matches!(store.open("f"), Err(StorageError::NotFound(_))));
}

pub const ALL: [fn(&mut dyn BackingStore); 5] = [
    reads_back_what_was_written,
    read_at_end_of_file_is_short,
    write_past_end_zero_fills_the_gap,
    create_truncates,
    missing_files_and_handles_are_errors,
];

#[test]
fn memory_store_meets_the_contract() {
    for check in ALL {
        check(&mut MemoryFileSystem::new());
    }
}

#[test]
fn memory_store_exposes_contents() {
    let mut fs = MemoryFileSystem::new();
    let fid = fs.create("swap").unwrap();
    let _ = fs.write(fid, b"abc").unwrap();
    assert_eq!(fs.open_files(), 1);
    fs.close(fid).unwrap();

    assert!(fs.exists("swap"));
    assert_eq!(fs.contents("swap"), Some(&b"abc"[..]));
    assert_eq!(fs.open_files(), 0);
}
