//! Clock Replacement Tests.
//!
//! The policy is driven through a plain map of pages, so every `used` bit is
//! under the test's control.

use std::collections::HashMap;

use mipsim_core::core::units::mmu::page::{Page, PageKey};
use mipsim_core::kernel::KernelError;
use mipsim_core::kernel::replacement::{Clock, PageDirectory, PageReplacement, Replacement};
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════

#[derive(Default)]
struct Pages(HashMap<PageKey, Page>);

impl Pages {
    fn add(&mut self, key: PageKey) {
        let _ = self.0.insert(key, Page::new(key.pid, key.vpn, false));
    }

    /// Simulates an access by the running program.
    fn touch(&mut self, key: PageKey) {
        self.0.get_mut(&key).unwrap().used = true;
    }

    fn used(&self, key: PageKey) -> bool {
        self.0[&key].used
    }
}

impl PageDirectory for Pages {
    fn page_mut(&mut self, key: PageKey) -> Option<&mut Page> {
        self.0.get_mut(&key)
    }
}

const A: PageKey = PageKey::new(1, 0);
const B: PageKey = PageKey::new(1, 1);
const C: PageKey = PageKey::new(1, 2);
const D: PageKey = PageKey::new(2, 0);

fn pages() -> Pages {
    let mut pages = Pages::default();
    for key in [A, B, C, D] {
        pages.add(key);
    }
    pages
}

// ══════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════

#[test]
fn free_frames_are_claimed_lowest_first() {
    let mut clock = Clock::new(2);
    let mut pages = pages();
    assert_eq!(clock.replace(A, &mut pages).unwrap(), Replacement { frame: 0, evicted: None });
    assert_eq!(clock.replace(B, &mut pages).unwrap(), Replacement { frame: 1, evicted: None });
    assert_eq!(clock.free_frames(), 0);
    assert_eq!(clock.owner(1), Some(B));
}

#[test]
fn two_frames_three_pages_literal_eviction_order() {
    let mut clock = Clock::new(2);
    let mut pages = pages();

    let _ = clock.replace(A, &mut pages).unwrap();
    pages.touch(A);
    let _ = clock.replace(B, &mut pages).unwrap();
    pages.touch(B);

    // Both used: the sweep clears A then B, wraps, and takes frame 0.
    let r = clock.replace(C, &mut pages).unwrap();
    assert_eq!(r, Replacement { frame: 0, evicted: Some(A) });
    assert_eq!(clock.hand(), 1);
    assert!(!pages.used(B), "B's bit was cleared by the sweep");
    assert_eq!(clock.owner(0), Some(C));

    // B was passed over once and not touched since: it goes next.
    pages.touch(C);
    let r = clock.replace(D, &mut pages).unwrap();
    assert_eq!(r, Replacement { frame: 1, evicted: Some(B) });
    assert_eq!(clock.hand(), 0);
}

#[test]
fn recently_used_page_gets_a_second_chance() {
    let mut clock = Clock::new(2);
    let mut pages = pages();
    let _ = clock.replace(A, &mut pages).unwrap();
    let _ = clock.replace(B, &mut pages).unwrap();
    pages.touch(A);

    let r = clock.replace(C, &mut pages).unwrap();
    assert_eq!(r.evicted, Some(B));
    assert_eq!(r.frame, 1);
    assert!(!pages.used(A));
}

#[test]
fn removed_process_frees_its_frames() {
    let mut clock = Clock::new(3);
    let mut pages = pages();
    let _ = clock.replace(A, &mut pages).unwrap();
    let _ = clock.replace(D, &mut pages).unwrap();
    let _ = clock.replace(B, &mut pages).unwrap();

    assert_eq!(clock.remove_process(1), 2);
    assert_eq!(clock.free_frames(), 2);
    assert_eq!(clock.owner(1), Some(D));

    // Freed frames are reused before anything is evicted.
    let r = clock.replace(C, &mut pages).unwrap();
    assert_eq!(r, Replacement { frame: 0, evicted: None });
}

#[test]
fn released_frame_is_reused() {
    let mut clock = Clock::new(1);
    let mut pages = pages();
    let _ = clock.replace(A, &mut pages).unwrap();
    clock.release(0);
    assert_eq!(clock.owner(0), None);
    assert_eq!(clock.replace(B, &mut pages).unwrap().evicted, None);
}

#[test]
fn owner_missing_from_directory_is_reported() {
    let mut clock = Clock::new(1);
    let mut pages = pages();
    let ghost = PageKey::new(9, 9);
    let _ = clock.replace(ghost, &mut pages).unwrap();
    assert!(matches!(
        clock.replace(A, &mut pages),
        Err(KernelError::InvalidPage(k)) if k == ghost
    ));
}

#[test]
fn no_frames_is_out_of_memory() {
    let mut clock = Clock::new(0);
    assert!(matches!(clock.replace(A, &mut pages()), Err(KernelError::OutOfMemory)));
    assert!(clock.evicts());
}
