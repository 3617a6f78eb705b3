//! Host Store Tests.

use mipsim_core::storage::{BackingStore, HostFileSystem, StorageError};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

use super::contract::ALL;

#[test]
fn host_store_meets_the_contract() {
    for check in ALL {
        let dir = TempDir::new().unwrap();
        check(&mut HostFileSystem::new(dir.path()).unwrap());
    }
}

#[test]
fn files_land_in_the_root_directory() {
    let dir = TempDir::new().unwrap();
    let mut fs = HostFileSystem::new(dir.path().join("swap")).unwrap();
    let fid = fs.create("1_prog").unwrap();
    let _ = fs.write(fid, b"page").unwrap();
    fs.close(fid).unwrap();

    assert_eq!(fs.root(), dir.path().join("swap"));
    assert_eq!(std::fs::read(dir.path().join("swap/1_prog")).unwrap(), b"page");
}

#[rstest]
#[case("..")]
#[case(".")]
#[case("../escape")]
#[case("a/b")]
#[case("nul\0")]
fn names_cannot_leave_the_root(#[case] name: &str) {
    let dir = TempDir::new().unwrap();
    let mut fs = HostFileSystem::new(dir.path()).unwrap();
    assert!(matches!(fs.create(name), Err(StorageError::InvalidName(_))));
    assert!(matches!(fs.unlink(name), Err(StorageError::InvalidName(_))));
}
