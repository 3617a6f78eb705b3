//! Swap Space Tests.

use mipsim_core::core::units::mmu::page::Page;
use mipsim_core::storage::{MemoryFileSystem, StorageError, SwapSpace};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;

use crate::common::mocks::storage::MockStore;

fn page(pid: usize, vpn: usize, fill: u8) -> Page {
    let mut page = Page::new(pid, vpn, false);
    page.data.fill(fill);
    page
}

#[test]
fn file_names_combine_pid_and_program() {
    assert_eq!(SwapSpace::file_name(12, "shell"), "12_shell");
}

#[test]
fn pages_round_trip_in_any_order() {
    let mut swap = SwapSpace::new(Box::new(MemoryFileSystem::new()));
    swap.save("prog", &page(1, 3, 0x33)).unwrap();
    swap.save("prog", &page(1, 1, 0x11)).unwrap();
    swap.save("prog", &page(1, 3, 0x34)).unwrap();

    let mut back = Page::new(1, 1, false);
    swap.load("prog", &mut back).unwrap();
    assert!(back.data.iter().all(|&b| b == 0x11));
    back.vpn = 3;
    swap.load("prog", &mut back).unwrap();
    assert!(back.data.iter().all(|&b| b == 0x34));
}

#[test]
fn save_leaves_page_flags_alone() {
    let mut swap = SwapSpace::new(Box::new(MemoryFileSystem::new()));
    let p = page(1, 0, 1);
    swap.save("prog", &p).unwrap();
    assert!(!p.saved);
    assert!(!p.present);
}

#[test]
fn processes_have_separate_files() {
    let mut swap = SwapSpace::new(Box::new(MemoryFileSystem::new()));
    swap.save("prog", &page(1, 0, 0xAA)).unwrap();
    swap.save("prog", &page(2, 0, 0xBB)).unwrap();
    swap.discard(1, "prog").unwrap();

    assert!(matches!(
        swap.load("prog", &mut Page::new(1, 0, false)),
        Err(StorageError::NotFound(_))
    ));
    let mut other = Page::new(2, 0, false);
    swap.load("prog", &mut other).unwrap();
    assert_eq!(other.data[0], 0xBB);
}

#[test]
fn unwritten_slot_is_a_short_transfer() {
    let mut swap = SwapSpace::new(Box::new(MemoryFileSystem::new()));
    swap.save("prog", &page(1, 0, 1)).unwrap();
    assert!(matches!(
        swap.load("prog", &mut Page::new(1, 4, false)),
        Err(StorageError::ShortTransfer { expected: 1024, actual: 0 })
    ));
}

#[test]
fn discarding_a_missing_file_is_fine() {
    let mut swap = SwapSpace::new(Box::new(MemoryFileSystem::new()));
    swap.discard(7, "never").unwrap();
}

#[test]
fn short_write_is_reported_and_the_file_closed() {
    let mut store = MockStore::new();
    let _ = store
        .expect_open()
        .with(eq("5_prog"))
        .times(1)
        .returning(|_| Ok(3));
    let _ = store
        .expect_seek()
        .with(eq(3usize), eq(2048u64))
        .times(1)
        .returning(|_, _| Ok(()));
    let _ = store.expect_write().times(1).returning(|_, _| Ok(100));
    let _ = store.expect_close().with(eq(3usize)).times(1).returning(|_| Ok(()));

    let mut swap = SwapSpace::new(Box::new(store));
    assert!(matches!(
        swap.save("prog", &page(5, 2, 0)),
        Err(StorageError::ShortTransfer { expected: 1024, actual: 100 })
    ));
}

#[test]
fn first_save_creates_the_file() {
    let mut store = MockStore::new();
    let _ = store
        .expect_open()
        .times(1)
        .returning(|name| Err(StorageError::NotFound(name.to_owned())));
    let _ = store.expect_create().with(eq("1_a")).times(1).returning(|_| Ok(0));
    let _ = store.expect_seek().returning(|_, _| Ok(()));
    let _ = store.expect_write().returning(|_, buf: &[u8]| Ok(buf.len()));
    let _ = store.expect_close().times(1).returning(|_| Ok(()));

    let mut swap = SwapSpace::new(Box::new(store));
    swap.save("a", &page(1, 0, 0)).unwrap();
}

#[test]
fn failed_seek_still_closes_the_file() {
    let mut store = MockStore::new();
    let _ = store.expect_open().returning(|_| Ok(0));
    let _ = store
        .expect_seek()
        .returning(|fid, _| Err(StorageError::BadFileId(fid)));
    let _ = store.expect_close().times(1).returning(|_| Ok(()));

    let mut swap = SwapSpace::new(Box::new(store));
    assert!(matches!(
        swap.load("a", &mut Page::new(1, 0, false)),
        Err(StorageError::BadFileId(0))
    ));
}

#[test]
fn swap_over_a_mock_store_is_debuggable() {
    let swap = SwapSpace::new(Box::new(MockStore::new()));
    assert!(format!("{swap:?}").contains("MockStore"));
}
