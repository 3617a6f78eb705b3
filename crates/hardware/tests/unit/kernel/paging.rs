//! Demand Paging Tests.
//!
//! Every test runs one user process against a single physical frame, so each
//! new page touched evicts the previous one.

use mipsim_core::common::constants::PAGE_SIZE;
use mipsim_core::common::{Exception, VirtAddr};
use mipsim_core::config::Config;
use mipsim_core::core::Cpu;
use mipsim_core::core::units::mmu::page::PageKey;
use mipsim_core::kernel::{Kernel, KernelError};
use pretty_assertions::assert_eq;

use super::dispatch_user;
use crate::common::builder::InstructionBuilder as I;
use crate::common::harness::{image, kernel_config, kernel_with};

/// One frame, with vpns 1..=8 as never-saved stack pages.
fn one_frame() -> Config {
    let mut config = kernel_config(1);
    config.memory.stack_pages = 8;
    config
}

fn started(config: &Config) -> (Kernel, Cpu) {
    let (mut kernel, mut cpu) = kernel_with(config);
    let program = image(&[I::j(0).build(), I::nop().build()]);
    let pid = kernel.spawn(&mut cpu, "prog", &program, &[], None).unwrap();
    assert_eq!(dispatch_user(&mut kernel, &mut cpu), pid);
    (kernel, cpu)
}

fn addr(vpn: usize, offset: u32) -> VirtAddr {
    VirtAddr::from_parts(vpn, offset)
}

/// Touches `vaddr` the way a load would: fault, page in, retry.
fn read(kernel: &mut Kernel, cpu: &mut Cpu, vaddr: VirtAddr) -> u32 {
    match cpu.read_mem(vaddr, 4) {
        Ok(v) => v,
        Err(Exception::PageFault(a)) => {
            kernel.handle_page_fault(cpu, a).unwrap();
            cpu.read_mem(vaddr, 4).unwrap()
        }
        Err(e) => panic!("unexpected {e}"),
    }
}

#[test]
fn dirty_page_survives_eviction_and_reload() {
    let (mut kernel, mut cpu) = started(&one_frame());
    let pid = kernel.current().unwrap();
    let target = addr(3, 4);

    let fault = cpu.write_mem(target, 4, 0xDEAD_BEEF);
    assert!(matches!(fault, Err(Exception::PageFault(a)) if a == target.val()));
    kernel.handle_page_fault(&mut cpu, target.val()).unwrap();
    cpu.write_mem(target, 4, 0xDEAD_BEEF).unwrap();
    assert_eq!(kernel.replacer().owner(0), Some(PageKey::new(pid, 3)));
    assert_eq!(cpu.stats.zero_fills, 1);

    // Page 7 takes the only frame; page 3 is dirty and goes to swap.
    assert_eq!(read(&mut kernel, &mut cpu, addr(7, 0)), 0);
    assert_eq!(kernel.replacer().owner(0), Some(PageKey::new(pid, 7)));
    assert_eq!(cpu.stats.page_evictions, 1);
    assert_eq!(cpu.stats.page_saves, 1);
    assert_eq!(cpu.stats.zero_fills, 2);

    let evicted = cpu.mmu.table().get(3).unwrap();
    assert!(!evicted.present);
    assert!(evicted.saved);
    assert_eq!(&evicted.data[4..8], &0xDEAD_BEEFu32.to_le_bytes());

    assert_eq!(read(&mut kernel, &mut cpu, target), 0xDEAD_BEEF);
    assert_eq!(cpu.stats.page_loads, 1);
}

#[test]
fn whole_page_round_trips_through_swap() {
    let (mut kernel, mut cpu) = started(&one_frame());
    let words = PAGE_SIZE / 4;

    let _ = read(&mut kernel, &mut cpu, addr(2, 0));
    for i in 0..words {
        cpu.write_mem(addr(2, i * 4), 4, i.wrapping_mul(0x9E37_79B9)).unwrap();
    }

    let _ = read(&mut kernel, &mut cpu, addr(5, 0));
    for i in 0..words {
        assert_eq!(
            read(&mut kernel, &mut cpu, addr(2, i * 4)),
            i.wrapping_mul(0x9E37_79B9),
            "word {i}"
        );
    }
}

#[test]
fn clean_saved_page_is_not_written_back() {
    let (mut kernel, mut cpu) = started(&one_frame());

    // The code page was saved at spawn and only fetched from.
    let _ = read(&mut kernel, &mut cpu, addr(0, 0));
    assert_eq!(cpu.stats.page_loads, 1);
    let _ = read(&mut kernel, &mut cpu, addr(4, 0));
    assert_eq!(cpu.stats.page_evictions, 1);
    assert_eq!(cpu.stats.page_saves, 0);
}

#[test]
fn fresh_frame_never_leaks_previous_contents() {
    let (mut kernel, mut cpu) = started(&one_frame());
    let _ = read(&mut kernel, &mut cpu, addr(1, 0));
    cpu.write_mem(addr(1, 0), 4, 0x5555_AAAA).unwrap();

    assert_eq!(read(&mut kernel, &mut cpu, addr(6, 0)), 0);
}

#[test]
fn stale_used_bits_of_other_processes_are_honoured() {
    let mut config = kernel_config(2);
    config.memory.stack_pages = 4;
    let (mut kernel, mut cpu) = kernel_with(&config);
    let program = image(&[I::j(0).build(), I::nop().build()]);
    let a = kernel.spawn(&mut cpu, "a", &program, &[], None).unwrap();
    let b = kernel.spawn(&mut cpu, "b", &program, &[], None).unwrap();

    assert_eq!(dispatch_user(&mut kernel, &mut cpu), a);
    let _ = read(&mut kernel, &mut cpu, addr(1, 0));
    assert_eq!(kernel.dispatch(&mut cpu).unwrap(), b);
    let _ = read(&mut kernel, &mut cpu, addr(1, 0));

    // Both frames are used; the sweep clears both and evicts a's page.
    let _ = read(&mut kernel, &mut cpu, addr(2, 0));
    assert_eq!(kernel.replacer().owner(0), Some(PageKey::new(b, 2)));
    let victim = kernel.process(a).unwrap().table.get(1).unwrap();
    assert!(!victim.present);
    assert!(victim.saved);
}

#[test]
fn page_outside_the_address_space_is_invalid() {
    let (mut kernel, mut cpu) = started(&one_frame());
    let beyond = addr(16, 0);
    assert!(matches!(
        kernel.handle_page_fault(&mut cpu, beyond.val()),
        Err(KernelError::InvalidPage(k)) if k.vpn == 16
    ));
}

#[test]
fn write_user_word_pages_in() {
    let (mut kernel, mut cpu) = started(&one_frame());
    kernel.write_user_word(&mut cpu, addr(4, 8).val(), 77).unwrap();
    assert_eq!(cpu.read_mem(addr(4, 8), 4).unwrap(), 77);
    assert_eq!(cpu.stats.zero_fills, 1);
}
